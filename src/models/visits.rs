use serde::{Deserialize, Serialize};

use super::common::Record;
use super::validation::{Validate, Validator, YEAR};
use super::Entity;
use crate::database::DbCollection;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitRequest {
    pub city: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub year: Option<String>,
}

impl Validate for VisitRequest {
    fn validate(&self, v: &mut Validator) {
        v.str_len("city", &self.city, 1, Some(100));
        v.str_len("country", &self.country, 1, Some(100));
        v.between("lat", self.lat, -90.0, 90.0);
        v.between("lng", self.lng, -180.0, 180.0);
        v.opt_pattern("year", self.year.as_deref(), &YEAR);
    }
}

pub type Visit = Record<VisitRequest>;

impl Entity for Visit {
    const NAME: &'static str = "Visit";
    const COLLECTION: DbCollection = DbCollection::Visits;
}
