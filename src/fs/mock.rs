//! テスト用モックファイルシステム

use super::*;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// テスト用モックファイルシステム
pub struct MockFs {
    files: RwLock<HashMap<String, MockFile>>,
    unreadable: RwLock<HashSet<String>>,
}

struct MockFile {
    content: Vec<u8>,
    file_type: FsFileType,
}

fn io_error(kind: std::io::ErrorKind, message: &str) -> crate::error::MfiError {
    crate::error::MfiError::Io(std::io::Error::new(kind, message.to_string()))
}

impl MockFs {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            unreadable: RwLock::new(HashSet::new()),
        }
    }

    /// ファイルを追加
    pub fn add_file(&self, path: &str, content: &str) {
        self.add_file_bytes(path, content.as_bytes());
    }

    /// バイナリファイルを追加
    pub fn add_file_bytes(&self, path: &str, content: &[u8]) {
        self.files.write().unwrap().insert(
            path.to_string(),
            MockFile {
                content: content.to_vec(),
                file_type: FsFileType::File,
            },
        );
    }

    /// ディレクトリを追加
    pub fn add_dir(&self, path: &str) {
        self.files.write().unwrap().insert(
            path.to_string(),
            MockFile {
                content: Vec::new(),
                file_type: FsFileType::Dir,
            },
        );
    }

    /// 読み込み時に PermissionDenied を返すパスとして登録
    ///
    /// ディレクトリを登録した場合、その配下のパスは種別の取得もできなくなる。
    pub fn mark_unreadable(&self, path: &str) {
        self.unreadable.write().unwrap().insert(path.to_string());
    }

    /// 書き込まれた内容を取得
    pub fn contents(&self, path: &str) -> Option<Vec<u8>> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .map(|f| f.content.clone())
    }

    fn check_readable(&self, key: &str) -> Result<()> {
        if self.unreadable.read().unwrap().contains(key) {
            return Err(io_error(std::io::ErrorKind::PermissionDenied, "permission denied"));
        }
        self.check_searchable(key)
    }

    /// 祖先ディレクトリに読めないものがあれば PermissionDenied
    fn check_searchable(&self, key: &str) -> Result<()> {
        let unreadable = self.unreadable.read().unwrap();
        let blocked = Path::new(key)
            .ancestors()
            .skip(1)
            .any(|ancestor| unreadable.contains(ancestor.to_string_lossy().as_ref()));
        if blocked {
            return Err(io_error(std::io::ErrorKind::PermissionDenied, "permission denied"));
        }
        Ok(())
    }
}

impl Default for MockFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFs {
    fn exists(&self, path: &Path) -> bool {
        self.files
            .read()
            .unwrap()
            .contains_key(path.to_string_lossy().as_ref())
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files
            .read()
            .unwrap()
            .get(path.to_string_lossy().as_ref())
            .map(|f| f.file_type == FsFileType::Dir)
            .unwrap_or(false)
    }

    fn file_type(&self, path: &Path) -> Result<FsFileType> {
        let key = path.to_string_lossy().to_string();
        self.check_searchable(&key)?;

        self.files
            .read()
            .unwrap()
            .get(&key)
            .map(|f| f.file_type)
            .ok_or_else(|| io_error(std::io::ErrorKind::NotFound, "not found"))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let key = path.to_string_lossy().to_string();
        self.check_readable(&key)?;

        let files = self.files.read().unwrap();
        match files.get(&key) {
            Some(file) if file.file_type == FsFileType::Dir => {
                Err(io_error(std::io::ErrorKind::IsADirectory, "is a directory"))
            }
            Some(file) => Ok(file.content.clone()),
            None => Err(io_error(std::io::ErrorKind::NotFound, "not found")),
        }
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes)
            .map_err(|_| io_error(std::io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"))
    }

    fn write(&self, path: &Path, content: &[u8]) -> Result<()> {
        self.files.write().unwrap().insert(
            path.to_string_lossy().to_string(),
            MockFile {
                content: content.to_vec(),
                file_type: FsFileType::File,
            },
        );
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.add_dir(&path.to_string_lossy());
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<FsDirEntry>> {
        let path_str = path.to_string_lossy().to_string();
        self.check_readable(&path_str)?;

        let files = self.files.read().unwrap();

        // パスがディレクトリとして存在するかチェック
        match files.get(&path_str) {
            Some(file) if file.file_type != FsFileType::Dir => {
                return Err(io_error(std::io::ErrorKind::NotADirectory, "Not a directory"));
            }
            None => return Err(io_error(std::io::ErrorKind::NotFound, "not found")),
            _ => {}
        }

        let prefix = if path_str.ends_with('/') {
            path_str.clone()
        } else {
            format!("{}/", path_str)
        };

        let entries: Vec<_> = files
            .iter()
            .filter(|(k, _)| {
                if !k.starts_with(&prefix) {
                    return false;
                }
                // 直接の子のみ（サブディレクトリの中身は除外）
                let remainder = &k[prefix.len()..];
                !remainder.is_empty() && !remainder.contains('/')
            })
            .map(|(k, v)| FsDirEntry {
                path: PathBuf::from(k),
                file_type: v.file_type,
            })
            .collect();

        Ok(entries)
    }
}
