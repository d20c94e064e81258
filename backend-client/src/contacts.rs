use crate::client::Client;
use crate::error::Result;
use crate::request::PendingRequest;
use crate::types::Contact;
use crate::types::ContactUpdate;
use crate::types::NewContact;
use crate::validation::Validate;
use crate::validation::require;

impl Client {
    pub async fn list_contacts(&self) -> Result<Vec<Contact>> {
        self.send_list(PendingRequest::get("/contacts")).await
    }

    pub async fn create_contact(&self, contact: &NewContact) -> Result<Contact> {
        contact.validate()?;
        self.send_json(PendingRequest::post("/contacts").with_json(contact)?)
            .await
    }

    pub async fn update_contact(&self, id: &str, update: &ContactUpdate) -> Result<Contact> {
        require("Contact id", id)?;
        self.send_json(PendingRequest::put(format!("/contacts/{id}")).with_json(update)?)
            .await
    }

    pub async fn delete_contact(&self, id: &str) -> Result<()> {
        require("Contact id", id)?;
        self.execute(PendingRequest::delete(format!("/contacts/{id}")))
            .await?;
        Ok(())
    }
}
