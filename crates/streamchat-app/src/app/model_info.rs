use anyhow::Result;

use streamchat_api::{ApiError, ChatClient};

use crate::output::{format_missing_model, format_model_info};

/// Print what the Ollama server knows about the configured model
pub async fn show_model_info(client: &ChatClient) -> Result<()> {
    match client.model_info().await {
        Ok(info) => {
            println!("{}", format_model_info(&info)?);
            Ok(())
        }
        Err(ApiError::ModelNotFound { model, available }) => {
            println!("{}", format_missing_model(&model, &available));
            Err(ApiError::ModelNotFound { model, available }.into())
        }
        Err(e) => Err(e.into()),
    }
}
