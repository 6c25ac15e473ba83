use snafu::{OptionExt, ensure};
use std::env;
use std::str::FromStr;

use crate::error::{InvalidConfigSnafu, MissingEnvVarSnafu, Result};
use crate::storage::constants::{DEFAULT_FS_ROOT, DEFAULT_PAGE_SIZE};
use crate::storage::{StorageConfig, StorageProvider};

// First of `keys` that is set, if any.
fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| env::var(key).ok())
}

// Like `first_env`, but required; the error names the primary key.
fn require_env(keys: &[&str]) -> Result<String> {
    first_env(keys).context(MissingEnvVarSnafu {
        key: keys.join(" or "),
    })
}

/// Load storage configuration from environment variables
pub fn load_storage_config() -> Result<StorageConfig> {
    let provider_str = env::var("STORAGE_PROVIDER").unwrap_or_else(|_| "fs".to_string());
    let provider = StorageProvider::from_str(&provider_str)?;

    let config = match provider {
        StorageProvider::Oss => load_oss_config()?,
        StorageProvider::S3 => load_s3_config(&provider_str)?,
        StorageProvider::Cos => load_cos_config()?,
        StorageProvider::Fs => load_fs_config(),
        StorageProvider::Hdfs => load_hdfs_config()?,
    };
    Ok(config.with_page_size(load_page_size()?))
}

fn load_page_size() -> Result<usize> {
    let Ok(raw) = env::var("STORAGE_PAGE_SIZE") else {
        return Ok(DEFAULT_PAGE_SIZE);
    };
    let page_size = raw
        .trim()
        .parse::<usize>()
        .ok()
        .context(InvalidConfigSnafu {
            key: "STORAGE_PAGE_SIZE",
            message: format!("'{raw}' is not a number"),
        })?;
    ensure!(
        page_size > 0,
        InvalidConfigSnafu {
            key: "STORAGE_PAGE_SIZE",
            message: "must be greater than zero"
        }
    );
    Ok(page_size)
}

/// Load OSS (Alibaba Cloud) configuration
fn load_oss_config() -> Result<StorageConfig> {
    let bucket = require_env(&["STORAGE_BUCKET", "OSS_BUCKET"])?;
    let access_key_id = require_env(&["STORAGE_ACCESS_KEY_ID", "OSS_ACCESS_KEY_ID"])?;
    let access_key_secret = require_env(&["STORAGE_ACCESS_KEY_SECRET", "OSS_ACCESS_KEY_SECRET"])?;
    let region = first_env(&["STORAGE_REGION", "OSS_REGION"]);
    let endpoint = first_env(&["STORAGE_ENDPOINT", "OSS_ENDPOINT"])
        .unwrap_or_else(|| "https://oss-cn-hangzhou.aliyuncs.com".to_string());

    let mut config = StorageConfig::oss(bucket, access_key_id, access_key_secret, region);
    config.endpoint = Some(endpoint);
    Ok(config)
}

/// Load S3 (AWS) or MinIO configuration
fn load_s3_config(provider_str: &str) -> Result<StorageConfig> {
    let is_minio = provider_str.eq_ignore_ascii_case("minio");

    let (bucket, access_key_id, secret_access_key) = if is_minio {
        (
            require_env(&["STORAGE_BUCKET", "MINIO_BUCKET"])?,
            require_env(&["STORAGE_ACCESS_KEY_ID", "MINIO_ACCESS_KEY"])?,
            require_env(&["STORAGE_ACCESS_KEY_SECRET", "MINIO_SECRET_KEY"])?,
        )
    } else {
        (
            require_env(&["STORAGE_BUCKET", "AWS_S3_BUCKET"])?,
            require_env(&["STORAGE_ACCESS_KEY_ID", "AWS_ACCESS_KEY_ID"])?,
            require_env(&["STORAGE_ACCESS_KEY_SECRET", "AWS_SECRET_ACCESS_KEY"])?,
        )
    };

    let region = first_env(&["STORAGE_REGION", "AWS_DEFAULT_REGION", "MINIO_DEFAULT_REGION"]);
    let endpoint = if is_minio {
        Some(
            first_env(&["STORAGE_ENDPOINT", "MINIO_ENDPOINT"])
                .unwrap_or_else(|| "http://localhost:9000".to_string()),
        )
    } else {
        first_env(&["STORAGE_ENDPOINT"])
    };

    let mut config = StorageConfig::s3(bucket, access_key_id, secret_access_key, region);
    config.endpoint = endpoint;
    Ok(config)
}

/// Load COS (Tencent Cloud) configuration
fn load_cos_config() -> Result<StorageConfig> {
    let bucket = require_env(&["STORAGE_BUCKET", "COS_BUCKET"])?;
    let secret_id = require_env(&["STORAGE_ACCESS_KEY_ID", "COS_SECRET_ID"])?;
    let secret_key = require_env(&["STORAGE_ACCESS_KEY_SECRET", "COS_SECRET_KEY"])?;

    let mut config = StorageConfig::cos(bucket, secret_id, secret_key);
    config.endpoint = first_env(&["STORAGE_ENDPOINT", "COS_ENDPOINT"]);
    Ok(config)
}

/// Load filesystem configuration
fn load_fs_config() -> StorageConfig {
    let root_path = env::var("STORAGE_ROOT_PATH").unwrap_or_else(|_| DEFAULT_FS_ROOT.to_string());
    StorageConfig::fs(root_path)
}

fn load_hdfs_config() -> Result<StorageConfig> {
    let name_node = require_env(&["STORAGE_NAME_NODE", "HDFS_NAME_NODE"])?;
    let root_path = env::var("STORAGE_ROOT_PATH").unwrap_or_else(|_| "/".to_string());
    Ok(StorageConfig::hdfs(name_node, root_path))
}
