use serde::{Deserialize, Serialize};

use super::common::Record;
use super::validation::{Validate, Validator, SIMPLE_DATE_POSSIBLE_PAST, SIMPLE_TIME};
use super::Entity;
use crate::database::DbCollection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub iata: String,
    pub icao: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
}

impl Validate for Airport {
    fn validate(&self, v: &mut Validator) {
        v.str_len("iata", &self.iata, 3, Some(3));
        v.str_len("icao", &self.icao, 4, Some(4));
        v.str_len("name", &self.name, 1, Some(100));
        v.str_len("city", &self.city, 1, Some(100));
        v.str_len("country", &self.country, 1, Some(100));
        v.between("lat", self.lat, -90.0, 90.0);
        v.between("lng", self.lng, -180.0, 180.0);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
    pub icao: String,
    pub name: String,
}

impl Validate for Aircraft {
    fn validate(&self, v: &mut Validator) {
        v.str_len("icao", &self.icao, 2, Some(4));
        v.str_len("name", &self.name, 1, Some(100));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airline {
    pub iata: String,
    pub icao: String,
    pub name: String,
}

impl Validate for Airline {
    fn validate(&self, v: &mut Validator) {
        v.str_len("iata", &self.iata, 2, Some(2));
        v.str_len("icao", &self.icao, 3, Some(3));
        v.str_len("name", &self.name, 1, Some(100));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeatType {
    #[default]
    Aisle,
    Middle,
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlightClass {
    #[default]
    Economy,
    #[serde(rename = "Premium Economy")]
    PremiumEconomy,
    Business,
    First,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlightReason {
    #[default]
    Leisure,
    Business,
    Crew,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRequest {
    #[serde(alias = "flight_number")]
    pub flight_number: String,
    pub date: String,
    #[serde(alias = "departure_airport")]
    pub departure_airport: Airport,
    #[serde(alias = "arrival_airport")]
    pub arrival_airport: Airport,
    #[serde(alias = "departure_time")]
    pub departure_time: String,
    #[serde(alias = "arrival_time")]
    pub arrival_time: String,
    pub duration: String,
    pub distance: f64,
    pub airline: Airline,
    pub aircraft: Aircraft,
    #[serde(default)]
    pub registration: Option<String>,
    #[serde(default, alias = "seat_number")]
    pub seat_number: Option<String>,
    #[serde(default = "default_seat_type", alias = "seat_type")]
    pub seat_type: Option<SeatType>,
    #[serde(default = "default_flight_class", alias = "flight_class")]
    pub flight_class: Option<FlightClass>,
    #[serde(default = "default_flight_reason", alias = "flight_reason")]
    pub flight_reason: Option<FlightReason>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default, alias = "is_planned")]
    pub is_planned: bool,
}

fn default_seat_type() -> Option<SeatType> {
    Some(SeatType::default())
}

fn default_flight_class() -> Option<FlightClass> {
    Some(FlightClass::default())
}

fn default_flight_reason() -> Option<FlightReason> {
    Some(FlightReason::default())
}

impl Validate for FlightRequest {
    fn validate(&self, v: &mut Validator) {
        v.str_len("flightNumber", &self.flight_number, 3, Some(7));
        v.pattern("date", &self.date, &SIMPLE_DATE_POSSIBLE_PAST);
        v.nested("departureAirport", &self.departure_airport);
        v.nested("arrivalAirport", &self.arrival_airport);
        v.pattern("departureTime", &self.departure_time, &SIMPLE_TIME);
        v.pattern("arrivalTime", &self.arrival_time, &SIMPLE_TIME);
        v.pattern("duration", &self.duration, &SIMPLE_TIME);
        v.greater_than("distance", self.distance, 0.0);
        v.nested("airline", &self.airline);
        v.nested("aircraft", &self.aircraft);
        v.opt_str_len("registration", self.registration.as_deref(), 3, Some(10));
        v.opt_str_len("seatNumber", self.seat_number.as_deref(), 1, Some(3));
        v.opt_str_len("note", self.note.as_deref(), 0, Some(100));
    }
}

pub type Flight = Record<FlightRequest>;

impl Entity for Flight {
    const NAME: &'static str = "Flight";
    const COLLECTION: DbCollection = DbCollection::Flights;
}

#[derive(Debug, Default, Deserialize)]
pub struct FlightsQuery {
    #[serde(alias = "isPlanned")]
    pub is_planned: Option<bool>,
}

impl Validate for FlightsQuery {
    fn validate(&self, _v: &mut Validator) {}
}
