//! Terminal client for the user directory.
//!
//! Each invocation loads the table from the server, applies one action
//! through the synchronizer and prints the resulting table and banner.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use tokio::runtime::Builder;

use user_directory::client::{
    BannerKind, Field, HttpUsersApi, Outcome, Synchronizer, UserRecord, UsersApi,
};

/// `userdir` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "userdir", about = "Manage users on a user directory server", version)]
struct CliArgs {
    /// Server base URL.
    #[arg(
        long = "base-url",
        value_name = "url",
        env = "USERDIR_BASE_URL",
        default_value = "http://localhost:5000"
    )]
    base_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Print every user.
    List,
    /// Show one user's details.
    Show { id: String },
    /// Create a user.
    Add {
        #[arg(long)]
        firstname: String,
        #[arg(long)]
        lastname: String,
        #[arg(long)]
        email: String,
    },
    /// Change some fields of a user; unchanged values are not sent.
    Edit {
        id: String,
        #[command(flatten)]
        fields: EditFields,
    },
    /// Delete a user.
    Delete { id: String },
}

#[derive(Debug, Clone, Args)]
struct EditFields {
    #[arg(long)]
    firstname: Option<String>,
    #[arg(long)]
    lastname: Option<String>,
    #[arg(long)]
    email: Option<String>,
}

impl EditFields {
    fn entries(self) -> impl Iterator<Item = (Field, String)> {
        [
            (Field::FirstName, self.firstname),
            (Field::LastName, self.lastname),
            (Field::Email, self.email),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|value| (field, value)))
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let args = CliArgs::parse();
    let api = HttpUsersApi::new(&args.base_url)?;
    let mut sync = Synchronizer::new(api, DefaultClock);
    if sync.refresh().await == Outcome::Failed {
        return Err(banner_error(&sync));
    }

    let outcome = match args.command {
        Command::List => Outcome::Applied,
        Command::Show { id } => {
            let outcome = sync.select(&id).await;
            if let Some(user) = sync.details() {
                print_user(user);
                sync.clear_details();
            }
            return finish(&sync, outcome);
        }
        Command::Add {
            firstname,
            lastname,
            email,
        } => {
            sync.set_form_field(Field::FirstName, firstname);
            sync.set_form_field(Field::LastName, lastname);
            sync.set_form_field(Field::Email, email);
            sync.add().await
        }
        Command::Edit { id, fields } => {
            if sync.table().row(&id).is_none() {
                return Err(eyre!("no user with id {id}"));
            }
            sync.begin_edit(id.clone());
            for (field, value) in fields.entries() {
                sync.input(id.clone(), field, value);
            }
            sync.commit().await
        }
        Command::Delete { id } => sync.delete(&id).await,
    };

    for row in sync.table().rows() {
        print_user(&UserRecord {
            id: row.id().to_owned(),
            fields: row.saved().clone(),
        });
    }
    finish(&sync, outcome)
}

fn print_user(user: &UserRecord) {
    println!(
        "{}\t{}\t{}\t{}",
        user.id, user.fields.firstname, user.fields.lastname, user.fields.email
    );
}

fn finish<A: UsersApi>(sync: &Synchronizer<A, DefaultClock>, outcome: Outcome) -> Result<()> {
    match outcome {
        Outcome::Failed => Err(banner_error(sync)),
        Outcome::Unchanged => {
            eprintln!("nothing to change");
            Ok(())
        }
        Outcome::Applied => {
            if let Some(banner) = sync.banner() {
                if banner.kind == BannerKind::Success {
                    eprintln!("{}", banner.message);
                }
            }
            Ok(())
        }
    }
}

fn banner_error<A: UsersApi>(sync: &Synchronizer<A, DefaultClock>) -> color_eyre::Report {
    match sync.banner() {
        Some(banner) => eyre!("{}", banner.message),
        None => eyre!("request failed"),
    }
}
