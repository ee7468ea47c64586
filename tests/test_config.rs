mod common;

use common::ContentDir;
use gemserve::config::{CONFIG_ENV, Config};
use gemserve::content::ContentPath;

#[test]
fn test_config_defaults() {
    let cfg = Config::from_yaml("content: ./content\nhost: example.org\n").unwrap();

    assert_eq!(cfg.host, "example.org");
    assert_eq!(cfg.default_charset, "utf-8");
    assert!(!cfg.auto_list);
    assert!(cfg.block.is_empty());
    assert_eq!(cfg.site_name, "gemserve");
    assert_eq!(cfg.listen_addr.port(), 1965);
    assert_eq!(cfg.request_timeout_secs, 10);
    assert_eq!(cfg.tls.cert.to_str(), Some("cert.pem"));
    assert!(cfg.tls.passphrase.is_none());
    assert!(!cfg.http.enabled);
    assert_eq!(cfg.http.listen_addr.port(), 1966);
    assert!(cfg.http.css.is_none());
}

#[test]
fn test_config_full() {
    let yaml = r#"
content: /srv/gemini
host: capsule.example
block:
  - /private
  - /drafts/
default_charset: iso-8859-1
auto_list: true
site_name: My Capsule
listen_addr: 127.0.0.1:11965
tls:
  cert: /etc/gemserve/cert.pem
  key: /etc/gemserve/key.pem
http:
  enabled: true
  listen_addr: 127.0.0.1:8080
"#;
    let cfg = Config::from_yaml(yaml).unwrap();

    assert_eq!(cfg.block.len(), 2);
    assert!(cfg.block.is_blocked(&ContentPath::parse("/drafts/x.gmi").unwrap()));
    assert!(cfg.auto_list);
    assert_eq!(cfg.site_name, "My Capsule");
    assert_eq!(cfg.listen_addr.to_string(), "127.0.0.1:11965");
    assert!(cfg.http.enabled);
    assert_eq!(cfg.http.listen_addr.to_string(), "127.0.0.1:8080");
}

#[test]
fn test_config_requires_host() {
    assert!(Config::from_yaml("content: ./content\n").is_err());
    assert!(Config::from_yaml("content: ./content\nhost: \"\"\n").is_err());
    assert!(Config::from_yaml("content: ./content\nhost: a b\n").is_err());
}

#[test]
fn test_config_rejects_escaping_block_prefix() {
    let yaml = "content: ./content\nhost: h\nblock: [/../etc]\n";
    assert!(Config::from_yaml(yaml).is_err());
}

#[test]
fn test_config_from_file_loads_stylesheet() {
    let dir = ContentDir::new().file("style.css", "body { color: #333; }");
    let css = dir.path().join("style.css");
    let yaml = format!(
        "content: ./content\nhost: h\nhttp:\n  css: {:?}\n",
        css.display().to_string()
    );
    let dir = dir.file("config.yaml", yaml);

    let cfg = Config::from_file(dir.path().join("config.yaml")).unwrap();
    assert_eq!(cfg.http.css.as_deref(), Some("body { color: #333; }"));
}

#[test]
fn test_config_missing_file() {
    let err = Config::from_file("/definitely/not/here.yaml").unwrap_err();
    assert!(err.to_string().contains("failed to read config"));
}

#[test]
fn test_config_load_from_env() {
    let dir = ContentDir::new().file("gemserve.yaml", "content: ./c\nhost: env.example\n");
    unsafe {
        std::env::set_var(CONFIG_ENV, dir.path().join("gemserve.yaml"));
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.host, "env.example");
    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }
}

#[test]
fn test_config_clone() {
    let cfg1 = Config::from_yaml("content: ./content\nhost: example.org\n").unwrap();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1.host, cfg2.host);
    assert_eq!(cfg1.content, cfg2.content);
}
