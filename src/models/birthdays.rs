use serde::{Deserialize, Serialize};

use super::common::Record;
use super::validation::{Validate, Validator, MONTH_PER_DAY};
use super::Entity;
use crate::database::DbCollection;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BirthdayRequest {
    pub name: String,
    /// Month and day, e.g. `12/31`
    pub date: String,
}

impl Validate for BirthdayRequest {
    fn validate(&self, v: &mut Validator) {
        v.str_len("name", &self.name, 1, Some(100));
        v.pattern("date", &self.date, &MONTH_PER_DAY);
    }
}

pub type Birthday = Record<BirthdayRequest>;

impl Entity for Birthday {
    const NAME: &'static str = "Birthday";
    const COLLECTION: DbCollection = DbCollection::Birthdays;
}
