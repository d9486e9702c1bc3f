use super::*;

use tempfile::TempDir;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_apply_without_file_or_env() {
    let dir = TempDir::new().expect("tempdir");
    let settings = load_settings_from(&dir.path().join(CONFIG_FILE), no_env);
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.upload_url, DEFAULT_UPLOAD_URL);
    assert_eq!(settings.host, HostKind::Native);
}

#[test]
fn reads_flat_toml_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE);
    fs::write(
        &path,
        r#"
data_dir = "/var/lib/photos"
documents_dir = "/srv/documents"
cache_dir = "/var/cache/photos"
upload_url = "https://photos.example/upload"
host = "web"
http_timeout_seconds = "30"
"#,
    )
    .expect("write config");

    let settings = load_settings_from(&path, no_env);

    assert_eq!(settings.data_dir, Some(PathBuf::from("/var/lib/photos")));
    assert_eq!(settings.documents_dir, Some(PathBuf::from("/srv/documents")));
    assert_eq!(settings.cache_dir, Some(PathBuf::from("/var/cache/photos")));
    assert_eq!(settings.upload_url, "https://photos.example/upload");
    assert_eq!(settings.host, HostKind::Web);
    assert_eq!(settings.http_timeout_seconds, Some(30));
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE);
    fs::write(&path, "upload_url = \"https://file/upload\"\n").expect("write config");

    let settings = load_settings_from(&path, |key| match key {
        "PHOTO_LOCKER_UPLOAD_URL" => Some("https://env/upload".to_string()),
        "APP__UPLOAD_URL" => Some("https://app/upload".to_string()),
        "PHOTO_LOCKER_DATA_DIR" => Some("/tmp/photos".to_string()),
        _ => None,
    });

    assert_eq!(settings.upload_url, "https://app/upload");
    assert_eq!(settings.data_dir, Some(PathBuf::from("/tmp/photos")));
}

#[test]
fn invalid_values_keep_previous_settings() {
    let dir = TempDir::new().expect("tempdir");
    let settings = load_settings_from(&dir.path().join(CONFIG_FILE), |key| match key {
        "PHOTO_LOCKER_HOST" => Some("desktop".to_string()),
        "APP__HTTP_TIMEOUT_SECONDS" => Some("soon".to_string()),
        _ => None,
    });

    assert_eq!(settings.host, HostKind::Native);
    assert_eq!(settings.http_timeout_seconds, None);
}

#[test]
fn zero_timeout_means_no_timeout() {
    let dir = TempDir::new().expect("tempdir");
    let settings = load_settings_from(&dir.path().join(CONFIG_FILE), |key| {
        (key == "APP__HTTP_TIMEOUT_SECONDS").then(|| "0".to_string())
    });
    assert_eq!(settings.http_timeout_seconds, None);
}

#[test]
fn malformed_file_falls_back_to_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE);
    fs::write(&path, "this is not = = toml").expect("write config");

    assert_eq!(load_settings_from(&path, no_env), Settings::default());
}

#[test]
fn storage_area_env_overrides_apply_per_area() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE);
    fs::write(&path, "cache_dir = \"/file/cache\"\n").expect("write config");

    let settings = load_settings_from(&path, |key| match key {
        "PHOTO_LOCKER_DOCUMENTS_DIR" => Some("/env/documents".to_string()),
        "APP__CACHE_DIR" => Some("/app/cache".to_string()),
        _ => None,
    });

    assert_eq!(settings.data_dir, None);
    assert_eq!(settings.documents_dir, Some(PathBuf::from("/env/documents")));
    assert_eq!(settings.cache_dir, Some(PathBuf::from("/app/cache")));
}

#[test]
fn configured_areas_are_used_as_storage_roots() {
    let settings = Settings {
        data_dir: Some(PathBuf::from("/photos/data")),
        documents_dir: Some(PathBuf::from("/photos/docs")),
        cache_dir: Some(PathBuf::from("/photos/cache")),
        ..Settings::default()
    };

    let roots = settings.directory_roots().expect("roots");

    assert_eq!(
        roots,
        DirectoryRoots {
            data: PathBuf::from("/photos/data"),
            documents: PathBuf::from("/photos/docs"),
            cache: PathBuf::from("/photos/cache"),
        }
    );
}

#[test]
fn data_dir_holds_the_image_directory_directly() {
    let dir = TempDir::new().expect("tempdir");
    let settings = Settings {
        data_dir: Some(dir.path().to_path_buf()),
        documents_dir: Some(dir.path().join("docs")),
        cache_dir: Some(dir.path().join("cache")),
        ..Settings::default()
    };
    let store = storage::FsLocalStore::new(settings.directory_roots().expect("roots"));

    let resolved = store
        .resolve(Directory::Data, shared::domain::IMAGE_DIR)
        .expect("resolve");
    assert_eq!(resolved, dir.path().join("stored-images"));
}
