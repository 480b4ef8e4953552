//! Typed facades over the back-office REST endpoints.
//!
//! Each facade borrows the client and only builds paths, query strings and
//! bodies; auth, envelopes and session handling stay in [`ApiClient`].
//! Entity payloads are passed through as JSON.
//!
//! ```rust,ignore
//! let page = client.players().list(&PageQuery::new(1, 10)).await;
//! let sent = client.whatsapp().send(&["+15550100".into()], "Tee time moved").await;
//! ```

mod admin;
mod attachments;
mod collection;
mod forms;
mod products;
mod questions;
mod templates;
mod whatsapp;

pub use admin::Admin;
pub use attachments::Attachments;
pub use collection::Collection;
pub use forms::Forms;
pub use products::{ProductLink, Products};
pub use questions::Questions;
pub use templates::Templates;
pub use whatsapp::WhatsApp;

use crate::client::ApiClient;

/// Page size of the record tables.
const TABLE_PER_PAGE: u32 = 10;
/// The contacts table shows more rows per page.
const CONTACTS_PER_PAGE: u32 = 50;

impl ApiClient {
    /// Intake forms and their responses.
    #[must_use]
    pub fn forms(&self) -> Forms<'_> {
        Forms::new(self)
    }

    /// Product generation and product-link delivery.
    #[must_use]
    pub fn products(&self) -> Products<'_> {
        Products::new(self)
    }

    /// Player records.
    #[must_use]
    pub fn players(&self) -> Collection<'_> {
        Collection::new(self, "players", TABLE_PER_PAGE)
    }

    /// Handicap records.
    #[must_use]
    pub fn handicaps(&self) -> Collection<'_> {
        Collection::new(self, "handicaps", TABLE_PER_PAGE)
    }

    /// Contact records.
    #[must_use]
    pub fn contacts(&self) -> Collection<'_> {
        Collection::new(self, "contacts", CONTACTS_PER_PAGE)
    }

    /// Service listings.
    #[must_use]
    pub fn listings(&self) -> Collection<'_> {
        Collection::new(self, "listings", TABLE_PER_PAGE)
    }

    /// Q&A moderation.
    #[must_use]
    pub fn questions(&self) -> Questions<'_> {
        Questions::new(self)
    }

    /// SMS and product templates.
    #[must_use]
    pub fn templates(&self) -> Templates<'_> {
        Templates::new(self)
    }

    /// WhatsApp messaging.
    #[must_use]
    pub fn whatsapp(&self) -> WhatsApp<'_> {
        WhatsApp::new(self)
    }

    /// Signed-in admin profile and settings.
    #[must_use]
    pub fn admin(&self) -> Admin<'_> {
        Admin::new(self)
    }

    /// File attachments.
    #[must_use]
    pub fn attachments(&self) -> Attachments<'_> {
        Attachments::new(self)
    }
}
