use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_matchrate_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("MATCHRATE_PORT");
        env::remove_var("MATCHRATE_BIND_ADDR");
        env::remove_var("MATCHRATE_MODEL_ID");
        env::remove_var("MATCHRATE_MODEL_REVISION");
        env::remove_var("MATCHRATE_MODEL_DIR");
        env::remove_var("MATCHRATE_HF_CACHE");
        env::remove_var("MATCHRATE_MAX_SEQ_LEN");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8046);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert_eq!(config.model_id, "snunlp/KR-SBERT-V40K-klueNLI-augSTS");
    assert_eq!(config.model_revision, "main");
    assert!(config.model_dir.is_none());
    assert!(config.hf_cache_dir.is_none());
    assert!(config.max_seq_len.is_none());
}

#[test]
fn test_socket_addr() {
    let config = Config::default();
    assert_eq!(config.socket_addr(), "127.0.0.1:8046");

    let config = Config {
        port: 3000,
        bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
fn test_socket_addr_ipv6_is_parseable() {
    let config = Config {
        bind_addr: IpAddr::V6(std::net::Ipv6Addr::LOCALHOST),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "[::1]:8046");
    assert!(config.socket_addr().parse::<std::net::SocketAddr>().is_ok());
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_matchrate_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.port, 8046);
    assert_eq!(config.model_id, "snunlp/KR-SBERT-V40K-klueNLI-augSTS");
    assert!(config.max_seq_len.is_none());
}

#[test]
#[serial]
fn test_from_env_custom_port() {
    clear_matchrate_env();

    with_env_vars(&[("MATCHRATE_PORT", "3000")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.port, 3000);
    });
}

#[test]
#[serial]
fn test_from_env_port_zero_rejected() {
    clear_matchrate_env();

    with_env_vars(&[("MATCHRATE_PORT", "0")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
    });
}

#[test]
#[serial]
fn test_from_env_port_not_a_number() {
    clear_matchrate_env();

    with_env_vars(&[("MATCHRATE_PORT", "http")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::PortParseError { .. }));
        assert!(err.to_string().contains("http"));
    });
}

#[test]
#[serial]
fn test_from_env_ipv6_bind_addr() {
    clear_matchrate_env();

    with_env_vars(&[("MATCHRATE_BIND_ADDR", "::1")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(
            config.bind_addr,
            IpAddr::V6(std::net::Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1))
        );
    });
}

#[test]
#[serial]
fn test_from_env_invalid_bind_addr() {
    clear_matchrate_env();

    with_env_vars(&[("MATCHRATE_BIND_ADDR", "not-an-ip")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
    });
}

#[test]
#[serial]
fn test_from_env_model_overrides() {
    clear_matchrate_env();

    with_env_vars(
        &[
            ("MATCHRATE_MODEL_ID", "sentence-transformers/all-MiniLM-L6-v2"),
            ("MATCHRATE_MODEL_REVISION", "v1.0"),
            ("MATCHRATE_HF_CACHE", "/var/cache/hf"),
            ("MATCHRATE_MAX_SEQ_LEN", "256"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.model_id, "sentence-transformers/all-MiniLM-L6-v2");
            assert_eq!(config.model_revision, "v1.0");
            assert_eq!(config.hf_cache_dir, Some(PathBuf::from("/var/cache/hf")));
            assert_eq!(config.max_seq_len, Some(256));
        },
    );
}

#[test]
#[serial]
fn test_from_env_blank_model_id_keeps_default() {
    clear_matchrate_env();

    with_env_vars(&[("MATCHRATE_MODEL_ID", "   ")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.model_id, "snunlp/KR-SBERT-V40K-klueNLI-augSTS");
    });
}

#[test]
#[serial]
fn test_from_env_max_seq_len_rejects_zero_and_garbage() {
    clear_matchrate_env();

    with_env_vars(&[("MATCHRATE_MAX_SEQ_LEN", "0")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMaxSeqLen { .. }));
    });

    with_env_vars(&[("MATCHRATE_MAX_SEQ_LEN", "lots")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMaxSeqLen { .. }));
    });
}

#[test]
#[serial]
fn test_from_env_empty_model_dir_is_none() {
    clear_matchrate_env();

    with_env_vars(&[("MATCHRATE_MODEL_DIR", "  ")], || {
        let config = Config::from_env().expect("should parse");
        assert!(config.model_dir.is_none());
    });
}

#[test]
fn test_validate_defaults() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validate_empty_model_id() {
    let config = Config {
        model_id: " ".to_string(),
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::EmptyModelId)));
}

#[test]
fn test_validate_missing_model_dir() {
    let config = Config {
        model_dir: Some(PathBuf::from("/nonexistent/matchrate/model")),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::PathNotFound { .. })
    ));
}

#[test]
fn test_validate_model_dir_is_file() {
    let file = tempfile::NamedTempFile::new().expect("temp file");
    let config = Config {
        model_dir: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));
}

#[test]
fn test_validate_existing_model_dir() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let config = Config {
        model_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_cache_dir_may_not_exist_yet() {
    let config = Config {
        hf_cache_dir: Some(PathBuf::from("/nonexistent/matchrate/cache")),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_sbert_config_carries_overrides() {
    let config = Config {
        model_id: "org/model".to_string(),
        model_revision: "abc123".to_string(),
        model_dir: Some(PathBuf::from("/models/sbert")),
        hf_cache_dir: Some(PathBuf::from("/cache")),
        max_seq_len: Some(64),
        ..Default::default()
    };

    let sbert = config.sbert_config();
    assert_eq!(sbert.model_id, "org/model");
    assert_eq!(sbert.revision, "abc123");
    assert_eq!(sbert.model_dir, Some(PathBuf::from("/models/sbert")));
    assert_eq!(sbert.cache_dir, Some(PathBuf::from("/cache")));
    assert_eq!(sbert.max_seq_len, Some(64));
}

#[test]
fn test_error_display() {
    let err = ConfigError::InvalidPort {
        value: "0".to_string(),
    };
    assert!(err.to_string().contains("between 1 and 65535"));

    let err = ConfigError::NotADirectory {
        path: PathBuf::from("/tmp/file"),
    };
    assert!(err.to_string().contains("/tmp/file"));
}
