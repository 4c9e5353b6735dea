use serde::{Deserialize, Serialize};

use super::common::Record;
use super::validation::{Validate, Validator, SIMPLE_DATE};
use super::Entity;
use crate::database::DbCollection;

/// A personal document, e.g. a passport number and its expiry date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalDataRequest {
    pub name: String,
    pub identifier: String,
    #[serde(default)]
    pub expiry: Option<String>,
}

impl Validate for PersonalDataRequest {
    fn validate(&self, v: &mut Validator) {
        v.str_len("name", &self.name, 1, Some(100));
        v.str_len("identifier", &self.identifier, 1, Some(100));
        v.opt_pattern("expiry", self.expiry.as_deref(), &SIMPLE_DATE);
    }
}

pub type PersonalData = Record<PersonalDataRequest>;

impl Entity for PersonalData {
    const NAME: &'static str = "PersonalData";
    const COLLECTION: DbCollection = DbCollection::PersonalData;
}
