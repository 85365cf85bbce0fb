//! 설정 파일 관리.
//!
//! JSON 설정 파일 로드/저장과 환경변수 오버라이드를 담당한다.
//! 플랫폼별 기본 경로 결정은 바이너리(`triage-app`)가 맡는다.

use crate::config::{AiProviderType, AppConfig, ExternalApiEndpoint};
use crate::error::CoreError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 설정 파일 이름
pub const CONFIG_FILE_NAME: &str = "config.json";

/// LLM API 키 환경변수
pub const ENV_LLM_API_KEY: &str = "TRIAGE_LLM_API_KEY";
/// LLM 엔드포인트 환경변수
pub const ENV_LLM_ENDPOINT: &str = "TRIAGE_LLM_ENDPOINT";
/// LLM 모델 환경변수
pub const ENV_LLM_MODEL: &str = "TRIAGE_LLM_MODEL";

/// 키만 주어졌을 때 사용하는 기본 엔드포인트
const DEFAULT_LLM_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";

/// 설정 관리자
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AppConfig,
    config_path: PathBuf,
}

impl ConfigManager {
    /// 지정된 경로로 설정 관리자 생성
    ///
    /// 설정 파일이 없으면 기본 설정을 생성하고 저장한다.
    pub fn with_path(config_path: PathBuf) -> Result<Self, CoreError> {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    CoreError::Config(format!(
                        "설정 디렉토리 생성 실패: {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
                info!("설정 디렉토리 생성: {}", parent.display());
            }
        }

        let config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            let default_config = AppConfig::default_config();
            Self::save_to_file(&config_path, &default_config)?;
            info!("기본 설정 파일 생성: {}", config_path.display());
            default_config
        };

        Ok(Self {
            config,
            config_path,
        })
    }

    /// 현재 설정
    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    /// 설정 업데이트 및 파일 저장
    pub fn update(&mut self, new_config: AppConfig) -> Result<(), CoreError> {
        Self::save_to_file(&self.config_path, &new_config)?;
        self.config = new_config;
        debug!("설정 저장 완료: {}", self.config_path.display());
        Ok(())
    }

    /// 설정 다시 로드
    pub fn reload(&mut self) -> Result<(), CoreError> {
        self.config = Self::load_from_file(&self.config_path)?;
        info!("설정 다시 로드 완료");
        Ok(())
    }

    /// 설정 파일 경로
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 설정 소유권 반환
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    fn load_from_file(path: &Path) -> Result<AppConfig, CoreError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("설정 파일 읽기 실패: {}: {}", path.display(), e))
        })?;

        let config: AppConfig = serde_json::from_str(&content).map_err(|e| {
            CoreError::Config(format!("설정 파일 파싱 실패: {}: {}", path.display(), e))
        })?;

        debug!("설정 파일 로드 완료: {}", path.display());
        Ok(config)
    }

    fn save_to_file(path: &Path, config: &AppConfig) -> Result<(), CoreError> {
        let content = serde_json::to_string_pretty(config)
            .map_err(|e| CoreError::Config(format!("설정 직렬화 실패: {}", e)))?;

        fs::write(path, content).map_err(|e| {
            CoreError::Config(format!("설정 파일 저장 실패: {}: {}", path.display(), e))
        })?;

        Ok(())
    }
}

/// 환경변수로 LLM 설정 오버라이드
///
/// `lookup`은 보통 `|k| std::env::var(k).ok()`. 키만 있고 엔드포인트 설정이
/// 없으면 Anthropic 기본 엔드포인트로 새 항목을 만든다.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = lookup(ENV_LLM_API_KEY).filter(|v| !v.trim().is_empty());
    let endpoint = lookup(ENV_LLM_ENDPOINT).filter(|v| !v.trim().is_empty());
    let model = lookup(ENV_LLM_MODEL).filter(|v| !v.trim().is_empty());

    if api_key.is_none() && endpoint.is_none() && model.is_none() {
        return;
    }

    let llm = config.llm.get_or_insert_with(|| ExternalApiEndpoint {
        endpoint: DEFAULT_LLM_ENDPOINT.to_string(),
        api_key: String::new(),
        model: None,
        timeout_secs: 20,
        provider_type: AiProviderType::Anthropic,
    });

    if let Some(key) = api_key {
        llm.api_key = key;
    }
    if let Some(url) = endpoint {
        llm.endpoint = url;
    }
    if let Some(name) = model {
        llm.model = Some(name);
    }
    debug!(endpoint = %llm.endpoint, "환경변수 LLM 설정 적용");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn create_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join(CONFIG_FILE_NAME);

        let manager = ConfigManager::with_path(config_path.clone()).unwrap();
        assert!(config_path.exists());
        assert_eq!(manager.get().analysis.stream_step_interval_ms, 300);
    }

    #[test]
    fn update_and_persist_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);

        let mut manager = ConfigManager::with_path(config_path.clone()).unwrap();
        let mut config = manager.get().clone();
        config.analysis.stream_step_interval_ms = 0;
        config.analysis.sensitive_path_markers.push("billing".to_string());
        manager.update(config).unwrap();

        let reloaded = ConfigManager::with_path(config_path).unwrap();
        assert_eq!(reloaded.get().analysis.stream_step_interval_ms, 0);
        assert!(reloaded
            .get()
            .analysis
            .sensitive_path_markers
            .contains(&"billing".to_string()));
    }

    #[test]
    fn reload_picks_up_file_edits() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        let mut manager = ConfigManager::with_path(config_path.clone()).unwrap();

        fs::write(&config_path, r#"{"analysis": {"stream_step_interval_ms": 42}}"#).unwrap();
        manager.reload().unwrap();
        assert_eq!(manager.get().analysis.stream_step_interval_ms, 42);
        // 누락된 필드는 기본값
        assert_eq!(manager.get().analysis.sensitive_path_markers.len(), 3);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "not json").unwrap();

        let result = ConfigManager::with_path(config_path);
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn env_key_creates_llm_endpoint() {
        let vars: HashMap<&str, &str> = [(ENV_LLM_API_KEY, "sk-live")].into_iter().collect();
        let mut config = AppConfig::default_config();
        apply_env_overrides(&mut config, |k| vars.get(k).map(|v| v.to_string()));

        let llm = config.llm.as_ref().unwrap();
        assert_eq!(llm.api_key, "sk-live");
        assert_eq!(llm.endpoint, DEFAULT_LLM_ENDPOINT);
        assert_eq!(llm.provider_type, AiProviderType::Anthropic);
        assert!(config.delegation_enabled());
    }

    #[test]
    fn env_without_values_leaves_config_untouched() {
        let mut config = AppConfig::default_config();
        apply_env_overrides(&mut config, |_| None);
        assert!(config.llm.is_none());
    }

    #[test]
    fn env_overrides_existing_endpoint_fields() {
        let mut config = AppConfig::default_config();
        config.llm = Some(ExternalApiEndpoint {
            endpoint: "http://old".to_string(),
            api_key: "old-key".to_string(),
            model: None,
            timeout_secs: 7,
            provider_type: AiProviderType::OpenAi,
        });
        let vars: HashMap<&str, &str> = [(ENV_LLM_ENDPOINT, "http://new"), (ENV_LLM_MODEL, "m-1")]
            .into_iter()
            .collect();
        apply_env_overrides(&mut config, |k| vars.get(k).map(|v| v.to_string()));

        let llm = config.llm.unwrap();
        assert_eq!(llm.endpoint, "http://new");
        assert_eq!(llm.api_key, "old-key");
        assert_eq!(llm.model.as_deref(), Some("m-1"));
        assert_eq!(llm.timeout_secs, 7);
        assert_eq!(llm.provider_type, AiProviderType::OpenAi);
    }
}
