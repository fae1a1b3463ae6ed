use clap::Subcommand;
use serde_json::json;

use crate::auth::password::{hash_password, validate_email_format, validate_password_strength};
use crate::cli::utils::output_success;
use crate::cli::{connect_store, OutputFormat};
use crate::database::models::NewUser;
use crate::database::UserStore;
use crate::types::Role;

#[derive(Subcommand)]
pub enum TrainerCommands {
    #[command(about = "Create a trainer account")]
    Create {
        #[arg(long, help = "Login email")]
        email: String,
        #[arg(long, help = "Display name")]
        name: String,
        #[arg(long, help = "Initial password (min 8 characters)")]
        password: String,
    },
}

pub async fn handle(cmd: TrainerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TrainerCommands::Create { email, name, password } => {
            if name.trim().is_empty() {
                anyhow::bail!("Name is required");
            }
            validate_email_format(email.trim()).map_err(anyhow::Error::msg)?;
            validate_password_strength(&password).map_err(anyhow::Error::msg)?;
            let password_hash = hash_password(&password).map_err(anyhow::Error::msg)?;

            let (manager, store) = connect_store().await?;
            let created = store
                .insert_user(NewUser::new(&email, &name, Role::Pt, password_hash))
                .await;
            manager.close().await;
            let user = created?;

            output_success(
                output_format,
                &format!("Trainer {} created", user.email),
                Some(json!({ "id": user.id, "email": user.email })),
            )
        }
    }
}
