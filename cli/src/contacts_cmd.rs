use anyhow::Result;
use saferoute_backend_client::types::ContactUpdate;
use saferoute_backend_client::types::NewContact;
use saferoute_backend_client::types::Role;

use crate::context::AppContext;
use crate::context::ApiResultExt;
use crate::render::or_dash;
use crate::render::print_json;

#[derive(Debug, clap::Subcommand)]
pub enum ContactsCommand {
    /// List trusted contacts.
    List {
        #[arg(long)]
        json: bool,
    },

    /// Add a trusted contact. Needs an email or a phone number.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        relation: Option<String>,
        /// Make this the primary contact.
        #[arg(long)]
        primary: bool,
    },

    /// Change fields of an existing contact.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        relation: Option<String>,
        #[arg(long)]
        primary: Option<bool>,
    },

    /// Delete a contact.
    Remove { id: String },
}

pub(crate) async fn run(ctx: &AppContext, cmd: ContactsCommand) -> Result<()> {
    ctx.require(Role::User)?;
    let client = ctx.client();
    match cmd {
        ContactsCommand::List { json } => {
            let contacts = client
                .list_contacts()
                .await
                .or_user_message("Unable to load contacts.")?;
            if json {
                return print_json(&contacts);
            }
            if contacts.is_empty() {
                println!("No trusted contacts yet.");
            }
            for contact in contacts {
                let primary = if contact.is_primary { " (primary)" } else { "" };
                println!(
                    "{}  {}{primary}  email: {}  phone: {}  relation: {}",
                    contact.id,
                    contact.name,
                    or_dash(contact.email.as_deref()),
                    or_dash(contact.phone.as_deref()),
                    or_dash(contact.relation.as_deref()),
                );
            }
        }
        ContactsCommand::Add {
            name,
            email,
            phone,
            relation,
            primary,
        } => {
            let contact = client
                .create_contact(&NewContact {
                    name,
                    email,
                    phone,
                    relation,
                    is_primary: primary,
                })
                .await
                .or_user_message("Unable to save contact.")?;
            println!("Added {} ({}).", contact.name, contact.id);
        }
        ContactsCommand::Update {
            id,
            name,
            email,
            phone,
            relation,
            primary,
        } => {
            let contact = client
                .update_contact(
                    &id,
                    &ContactUpdate {
                        name,
                        email,
                        phone,
                        relation,
                        is_primary: primary,
                    },
                )
                .await
                .or_user_message("Unable to update contact.")?;
            println!("Updated {} ({}).", contact.name, contact.id);
        }
        ContactsCommand::Remove { id } => {
            client
                .delete_contact(&id)
                .await
                .or_user_message("Unable to delete contact.")?;
            println!("Removed {id}.");
        }
    }
    Ok(())
}
