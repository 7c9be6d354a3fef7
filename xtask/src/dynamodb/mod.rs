//! DynamoDB infrastructure management commands.

mod client;
mod config;
mod deploy;
mod error;
mod planning;
mod seed;

pub use error::{DynamodbError, Result};

use crate::prelude::*;
use dialoguer::Confirm;

/// DynamoDB infrastructure management commands.
#[derive(Debug, clap::Parser)]
pub struct DynamodbCommand {
    #[command(subcommand)]
    pub action: DynamodbAction,
}

/// Available DynamoDB actions.
#[derive(Debug, clap::Subcommand)]
pub enum DynamodbAction {
    /// Deploy or destroy the product and user tables.
    Deploy(DeployCommand),

    /// Create a user that can log in to the catalog.
    SeedUser(SeedUserCommand),
}

/// Deploy or update DynamoDB infrastructure.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Deploy or destroy the catalog DynamoDB tables.

By default, this command creates the products table (with its owner index)
and the users table. Missing indexes are added to existing tables.

The command shows a plan of changes before applying and asks for confirmation.

Environment variables:
  AWS_ENDPOINT_URL    - Use local DynamoDB (e.g., http://localhost:8000)
  AWS_REGION          - AWS region (defaults to us-east-1)
  AWS_PROFILE         - AWS profile to use for credentials")]
pub struct DeployCommand {
    /// Skip confirmation prompts.
    #[arg(long)]
    pub force: bool,

    /// Destroy the tables instead of creating/updating.
    #[arg(long)]
    pub destroy: bool,

    /// Products table name.
    #[arg(long, default_value = "catalog-products", env = "PRODUCTS_TABLE")]
    pub products_table: String,

    /// Users table name.
    #[arg(long, default_value = "users-catalogo", env = "USERS_TABLE")]
    pub users_table: String,

    /// Name of the products index on the owner id.
    #[arg(long, default_value = "OwnerId", env = "OWNER_INDEX")]
    pub owner_index: String,
}

/// Create a catalog user.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Insert a user into the users table.

The password is stored as an Argon2 hash. The user can then log in with
the given user id, email and password.")]
pub struct SeedUserCommand {
    /// Login user id.
    #[arg(long)]
    pub user_id: String,

    /// Email that must match at login (case-sensitive).
    #[arg(long)]
    pub email: String,

    /// Plaintext password, hashed before it is stored.
    #[arg(long)]
    pub password: String,

    /// Company name returned on successful login.
    #[arg(long)]
    pub company: Option<String>,

    /// Users table name.
    #[arg(long, default_value = "users-catalogo", env = "USERS_TABLE")]
    pub users_table: String,

    /// Replace the user if it already exists.
    #[arg(long)]
    pub overwrite: bool,

    /// Skip confirmation prompts.
    #[arg(long)]
    pub force: bool,
}

/// Main entry point for dynamodb command.
pub async fn run(command: DynamodbCommand, global: crate::Global) -> Result<()> {
    match command.action {
        DynamodbAction::Deploy(deploy_cmd) => run_deploy(deploy_cmd, &global).await,
        DynamodbAction::SeedUser(seed_cmd) => run_seed_user(seed_cmd, &global).await,
    }
}

fn confirm(prompt: &str, default: bool) -> Result<()> {
    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?;

    if confirmed {
        Ok(())
    } else {
        Err(DynamodbError::UserCancelled)
    }
}

async fn run_deploy(cmd: DeployCommand, global: &crate::Global) -> Result<()> {
    let aws_config = client::AwsConfig::default();

    if !global.is_silent() {
        aprintln!("{} {}", p_b("Target:"), aws_config.target_display());
        aprintln!();
    }

    let dynamo_client = client::create_client(&aws_config).await;
    let tables = [
        config::products_table_config(&cmd.products_table, &cmd.owner_index),
        config::users_table_config(&cmd.users_table),
    ];

    if cmd.destroy {
        let mut plans = Vec::new();
        for table in &tables {
            let current = client::get_table_state(&dynamo_client, &table.table_name).await?;
            plans.push(planning::calculate_destroy_plan(
                current.as_ref(),
                &table.table_name,
            ));
        }

        if !global.is_silent() {
            aprintln!("{}", p_y("Destroy Plan:"));
            for line in plans.iter().flat_map(planning::format_destroy_plan) {
                aprintln!("  {}", p_r(&line));
            }
            aprintln!();
        }

        if plans.iter().all(planning::DestroyPlan::is_noop) {
            if !global.is_silent() {
                aprintln!("{}", p_g("Nothing to destroy."));
            }
            return Ok(());
        }

        if !cmd.force {
            confirm(
                "Are you sure you want to delete these tables? ALL DATA WILL BE LOST",
                false,
            )?;
        }

        if !global.is_silent() {
            aprintln!("{}", p_b("Deleting tables..."));
        }

        for plan in &plans {
            deploy::execute_destroy_plan(&dynamo_client, plan).await?;
        }

        if !global.is_silent() {
            aprintln!("{}", p_g("Tables destroyed successfully."));
        }
        return Ok(());
    }

    let mut plans = Vec::new();
    for table in &tables {
        let current = client::get_table_state(&dynamo_client, &table.table_name).await?;
        plans.push(planning::calculate_deploy_plan(current.as_ref(), table));
    }

    if !global.is_silent() {
        aprintln!("{}", p_c("Deploy Plan:"));
        for line in plans.iter().flat_map(planning::format_deploy_plan) {
            if line.starts_with('+') {
                aprintln!("  {}", p_g(&line));
            } else if line.starts_with('~') {
                aprintln!("  {}", p_y(&line));
            } else {
                aprintln!("  {}", line);
            }
        }
        aprintln!();
    }

    if plans.iter().all(planning::DeployPlan::is_noop) {
        if !global.is_silent() {
            aprintln!("{}", p_g("Infrastructure is up to date."));
        }
        return Ok(());
    }

    if !cmd.force {
        confirm("Apply these changes?", true)?;
    }

    if !global.is_silent() {
        aprintln!("{}", p_b("Applying changes..."));
    }

    for plan in &plans {
        deploy::execute_deploy_plan(&dynamo_client, plan).await?;
    }

    if !global.is_silent() {
        aprintln!("{}", p_g("Infrastructure deployed successfully."));
    }

    Ok(())
}

async fn run_seed_user(cmd: SeedUserCommand, global: &crate::Global) -> Result<()> {
    let aws_config = client::AwsConfig::default();

    if !global.is_silent() {
        aprintln!("{} {}", p_b("Target:"), aws_config.target_display());
        aprintln!("{} {}", p_b("Table:"), cmd.users_table);
        aprintln!("{} {}", p_b("User:"), cmd.user_id);
        aprintln!();
    }

    let dynamo_client = client::create_client(&aws_config).await;

    if client::get_table_state(&dynamo_client, &cmd.users_table)
        .await?
        .is_none()
    {
        return Err(DynamodbError::TableNotFound {
            table_name: cmd.users_table,
        });
    }

    let user = seed::build_user(
        &cmd.user_id,
        &cmd.email,
        &cmd.password,
        cmd.company.as_deref(),
    )?;

    if !cmd.force {
        let prompt = if cmd.overwrite {
            format!("Create or replace user '{}'?", user.user_id)
        } else {
            format!("Create user '{}'?", user.user_id)
        };
        confirm(&prompt, true)?;
    }

    seed::put_user(&dynamo_client, &cmd.users_table, &user, cmd.overwrite).await?;

    if !global.is_silent() {
        aprintln!("{} user '{}' saved.", p_g("Success:"), user.user_id);
    }

    Ok(())
}
