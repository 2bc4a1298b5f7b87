use super::*;
use crate::fs::mock::MockFs;
use crate::http::stub::StubHttp;

const SERVICE_YAML: &str = "apiVersion: v1\nkind: Service\nmetadata:\n  name: my-service\n";

fn resolver(fs: MockFs, http: StubHttp) -> (SourceResolver, Arc<StubHttp>) {
    let http = Arc::new(http);
    let resolver = SourceResolver::new(Arc::new(fs), http.clone());
    (resolver, http)
}

fn source_kind_of(err: MfiError) -> SourceErrorKind {
    match err {
        MfiError::Source(e) => e.kind,
        other => panic!("expected source error, got {other:?}"),
    }
}

// =========================================================================
// classify
// =========================================================================

mod classify_tests {
    use super::*;

    #[test]
    fn http_and_https_urls_are_remote() {
        let (resolver, _) = resolver(MockFs::new(), StubHttp::new());
        assert!(matches!(
            resolver.classify("http://example.com/a.yaml"),
            Ok(SourceLocation::Remote(_))
        ));
        assert!(matches!(
            resolver.classify("https://example.com/"),
            Ok(SourceLocation::Remote(_))
        ));
    }

    #[test]
    fn other_schemes_are_local_paths() {
        let fs = MockFs::new();
        fs.add_file("ftp://example.com/a.yaml", "");
        let (resolver, _) = resolver(fs, StubHttp::new());
        assert!(matches!(
            resolver.classify("ftp://example.com/a.yaml"),
            Ok(SourceLocation::LocalFile(_))
        ));
    }

    #[test]
    fn directory_and_file() {
        let fs = MockFs::new();
        fs.add_dir("/import");
        fs.add_file("/file.yaml", SERVICE_YAML);
        let (resolver, _) = resolver(fs, StubHttp::new());

        assert_eq!(
            resolver.classify("/import").unwrap(),
            SourceLocation::LocalDir(PathBuf::from("/import"))
        );
        assert_eq!(
            resolver.classify("/file.yaml").unwrap(),
            SourceLocation::LocalFile(PathBuf::from("/file.yaml"))
        );
    }

    #[test]
    fn missing_path_is_not_found() {
        let (resolver, _) = resolver(MockFs::new(), StubHttp::new());
        let err = resolver.classify("/missing").unwrap_err();
        assert_eq!(err.kind, SourceErrorKind::NotFound);
        assert_eq!(err.location, "/missing");
    }

    #[test]
    fn locked_parent_is_unreadable_not_missing() {
        let fs = MockFs::new();
        fs.add_dir("/private");
        fs.add_file("/private/file.yaml", SERVICE_YAML);
        fs.mark_unreadable("/private");
        let (resolver, _) = resolver(fs, StubHttp::new());

        let err = resolver.classify("/private/file.yaml").unwrap_err();
        assert_eq!(err.kind, SourceErrorKind::Unreadable);
        assert_eq!(err.location, "/private/file.yaml");
    }
}

// =========================================================================
// local file
// =========================================================================

#[tokio::test]
async fn resolve_single_file_yields_one_unit() {
    let fs = MockFs::new();
    fs.add_file("/apps/file.yaml", SERVICE_YAML);
    let (resolver, _) = resolver(fs, StubHttp::new());

    let units: Vec<_> = resolver.resolve("/apps/file.yaml").await.unwrap().collect();

    assert_eq!(units.len(), 1);
    let unit = units.into_iter().next().unwrap().unwrap();
    assert_eq!(unit.suggested_name, "file.yaml");
    assert_eq!(unit.raw_content, SERVICE_YAML.as_bytes());
    assert_eq!(unit.source_kind, SourceKind::LocalFile);
}

#[tokio::test]
async fn resolve_missing_file_is_not_found() {
    let (resolver, _) = resolver(MockFs::new(), StubHttp::new());
    let err = resolver.resolve("/nope.yaml").await.err().unwrap();
    assert_eq!(source_kind_of(err), SourceErrorKind::NotFound);
}

#[tokio::test]
async fn resolve_unreadable_file_is_unreadable() {
    let fs = MockFs::new();
    fs.add_file("/locked.yaml", SERVICE_YAML);
    fs.mark_unreadable("/locked.yaml");
    let (resolver, _) = resolver(fs, StubHttp::new());

    let err = resolver.resolve("/locked.yaml").await.err().unwrap();
    assert_eq!(source_kind_of(err), SourceErrorKind::Unreadable);
}

// =========================================================================
// directory
// =========================================================================

#[tokio::test]
async fn resolve_directory_filters_and_sorts_manifest_files() {
    let fs = MockFs::new();
    fs.add_dir("/import");
    fs.add_file("/import/b.json", "{}");
    fs.add_file("/import/a.yaml", SERVICE_YAML);
    fs.add_file("/import/c.yml", "kind: ConfigMap\n");
    fs.add_file("/import/README.md", "# docs");
    fs.add_file("/import/notes.txt", "ignore me");
    fs.add_dir("/import/nested.yaml");
    fs.add_file("/import/nested.yaml/deep.yaml", SERVICE_YAML);
    let (resolver, _) = resolver(fs, StubHttp::new());

    let units = resolver.resolve("/import").await.unwrap();
    assert_eq!(units.remaining(), 3);

    let names: Vec<String> = units.map(|u| u.unwrap().suggested_name).collect();
    assert_eq!(names, vec!["a.yaml", "b.json", "c.yml"]);
}

#[tokio::test]
async fn resolve_directory_units_are_dir_entries() {
    let fs = MockFs::new();
    fs.add_dir("/import");
    fs.add_file("/import/file.yaml", SERVICE_YAML);
    let (resolver, _) = resolver(fs, StubHttp::new());

    let unit = resolver
        .resolve("/import")
        .await
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    assert_eq!(unit.source_kind, SourceKind::LocalDirEntry);
    assert_eq!(unit.raw_content, SERVICE_YAML.as_bytes());
}

#[tokio::test]
async fn resolve_empty_directory_yields_nothing() {
    let fs = MockFs::new();
    fs.add_dir("/empty");
    fs.add_file("/empty/README.md", "");
    let (resolver, _) = resolver(fs, StubHttp::new());

    let units = resolver.resolve("/empty").await.unwrap();
    assert_eq!(units.count(), 0);
}

#[tokio::test]
async fn resolve_unreadable_directory_fails() {
    let fs = MockFs::new();
    fs.add_dir("/locked");
    fs.mark_unreadable("/locked");
    let (resolver, _) = resolver(fs, StubHttp::new());

    let err = resolver.resolve("/locked").await.err().unwrap();
    assert_eq!(source_kind_of(err), SourceErrorKind::Unreadable);
}

#[tokio::test]
async fn resolve_directory_unreadable_entry_is_unit_failure() {
    let fs = MockFs::new();
    fs.add_dir("/import");
    fs.add_file("/import/a.yaml", SERVICE_YAML);
    fs.add_file("/import/b.yaml", SERVICE_YAML);
    fs.mark_unreadable("/import/a.yaml");
    let (resolver, _) = resolver(fs, StubHttp::new());

    let items: Vec<_> = resolver.resolve("/import").await.unwrap().collect();
    assert_eq!(items.len(), 2);

    let failure = items[0].as_ref().unwrap_err();
    assert_eq!(failure.source_name, "a.yaml");
    assert!(matches!(
        &failure.cause,
        MfiError::Source(SourceError {
            kind: SourceErrorKind::Unreadable,
            ..
        })
    ));
    assert_eq!(items[1].as_ref().unwrap().suggested_name, "b.yaml");
}

// =========================================================================
// remote
// =========================================================================

#[tokio::test]
async fn resolve_http_prefers_content_disposition() {
    let http = StubHttp::new();
    http.serve(
        "http://example.com/download/123",
        SERVICE_YAML,
        &[("Content-Disposition", r#"attachment; filename="manifest.yaml""#)],
    );
    let (resolver, http) = resolver(MockFs::new(), http);

    let unit = resolver
        .resolve("http://example.com/download/123")
        .await
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    assert_eq!(unit.suggested_name, "manifest.yaml");
    assert_eq!(unit.raw_content, SERVICE_YAML.as_bytes());
    assert_eq!(unit.source_kind, SourceKind::Http);
    assert_eq!(http.requests(), vec!["http://example.com/download/123"]);
}

#[tokio::test]
async fn resolve_http_falls_back_to_url_tail() {
    let http = StubHttp::new();
    http.serve("https://example.com/repo/svc.json?ref=main", "{}", &[]);
    let (resolver, _) = resolver(MockFs::new(), http);

    let unit = resolver
        .resolve("https://example.com/repo/svc.json?ref=main")
        .await
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    assert_eq!(unit.suggested_name, "svc.json");
}

#[tokio::test]
async fn resolve_http_falls_back_to_placeholder() {
    let http = StubHttp::new();
    http.serve("https://example.com/", "{}", &[]);
    let (resolver, _) = resolver(MockFs::new(), http);

    let unit = resolver
        .resolve("https://example.com/")
        .await
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    assert_eq!(unit.suggested_name, PLACEHOLDER_NAME);
}

#[tokio::test]
async fn resolve_http_non_success_is_unreachable() {
    let http = StubHttp::new();
    http.serve_status("https://example.com/gone.yaml", 404);
    let (resolver, _) = resolver(MockFs::new(), http);

    let err = resolver
        .resolve("https://example.com/gone.yaml")
        .await
        .err()
        .unwrap();
    assert_eq!(source_kind_of(err), SourceErrorKind::Unreachable);
}

#[tokio::test]
async fn resolve_http_transport_error_is_unreachable() {
    let http = StubHttp::new();
    http.refuse("https://example.com/a.yaml");
    let (resolver, _) = resolver(MockFs::new(), http);

    let err = resolver
        .resolve("https://example.com/a.yaml")
        .await
        .err()
        .unwrap();
    assert_eq!(source_kind_of(err), SourceErrorKind::Unreachable);
}

// =========================================================================
// content_disposition_filename
// =========================================================================

mod content_disposition_tests {
    use super::*;

    #[test]
    fn quoted_filename() {
        assert_eq!(
            content_disposition_filename(r#"attachment; filename="manifest.yaml""#).as_deref(),
            Some("manifest.yaml")
        );
    }

    #[test]
    fn token_filename() {
        assert_eq!(
            content_disposition_filename("attachment; filename=svc.json; size=10").as_deref(),
            Some("svc.json")
        );
    }

    #[test]
    fn parameter_name_is_case_insensitive() {
        assert_eq!(
            content_disposition_filename(r#"inline; FileName="a.yml""#).as_deref(),
            Some("a.yml")
        );
    }

    #[test]
    fn directory_part_is_stripped() {
        assert_eq!(
            content_disposition_filename(r#"attachment; filename="../../etc/svc.yaml""#).as_deref(),
            Some("svc.yaml")
        );
    }

    #[test]
    fn missing_or_empty_filename() {
        assert_eq!(content_disposition_filename("attachment"), None);
        assert_eq!(content_disposition_filename(r#"attachment; filename="""#), None);
        assert_eq!(
            content_disposition_filename("attachment; filename*=UTF-8''a.yaml"),
            None
        );
    }
}
