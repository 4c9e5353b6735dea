use serde::{Deserialize, Serialize};

use super::flights::Flight;
use super::validation::{Validate, Validator, IATA_AIRLINE, IATA_AIRPORT};
use super::visits::Visit;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trips {
    pub flights: Vec<Flight>,
    pub visits: Vec<Visit>,
}

#[derive(Debug, Deserialize)]
pub struct AirportQuery {
    pub iata: String,
}

impl Validate for AirportQuery {
    fn validate(&self, v: &mut Validator) {
        v.pattern("iata", &self.iata, &IATA_AIRPORT);
    }
}

#[derive(Debug, Deserialize)]
pub struct AircraftQuery {
    pub search: String,
}

impl Validate for AircraftQuery {
    fn validate(&self, _v: &mut Validator) {}
}

#[derive(Debug, Default, Deserialize)]
pub struct AirlineQuery {
    pub iata: Option<String>,
    pub name: Option<String>,
}

impl Validate for AirlineQuery {
    fn validate(&self, v: &mut Validator) {
        v.opt_pattern("iata", self.iata.as_deref(), &IATA_AIRLINE);
        v.opt_str_len("name", self.name.as_deref(), 2, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::validation::validate;

    #[test]
    fn airport_code_is_three_letters() {
        assert!(validate(&AirportQuery { iata: "bud".to_string() }).is_ok());
        assert!(validate(&AirportQuery { iata: "BU1".to_string() }).is_err());
        assert!(validate(&AirportQuery { iata: "BUDA".to_string() }).is_err());
    }

    #[test]
    fn airline_filters_are_optional() {
        assert!(validate(&AirlineQuery::default()).is_ok());
        let query = AirlineQuery {
            iata: Some("W6".to_string()),
            name: Some("W".to_string()),
        };
        let errors = validate(&query).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].loc, vec!["body", "name"]);
    }
}
