use serde::{Deserialize, Serialize};

use super::common::Record;
use super::validation::{Validate, Validator};
use super::Entity;
use crate::database::DbCollection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub url: String,
}

impl Validate for Link {
    fn validate(&self, v: &mut Validator) {
        v.str_len("name", &self.name, 1, Some(100));
        v.http_url("url", &self.url);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub pinned: bool,
}

impl Validate for NoteRequest {
    fn validate(&self, v: &mut Validator) {
        v.opt_str_len("text", self.text.as_deref(), 0, Some(1000));
        v.each("links", &self.links);
    }
}

pub type Note = Record<NoteRequest>;

impl Entity for Note {
    const NAME: &'static str = "Note";
    const COLLECTION: DbCollection = DbCollection::Notes;
    const TIMESTAMPED: bool = true;
}
