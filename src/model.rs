use crate::{
    schema::{application, concierge_request, rsvp},
    validate::ValidatedRecord,
};
use diesel::Insertable;

///Insertable rows for the relational backend. Required columns are plain
///Strings backed by NOT NULL constraints; optional columns are Options so
///an empty normalized field stores as NULL.

#[derive(Insertable)]
#[diesel(table_name = rsvp)]
pub struct RsvpModel {
    id: String,
    created_at: String,
    code: String,
    first_name: String,
    last_name: String,
    plus_one: String,
    guest_name: Option<String>,
    notify: String,
    email: Option<String>,
    phone: Option<String>,
    diet: Option<String>,
    notes: Option<String>,
}

impl RsvpModel {
    pub fn from_validated(record: &ValidatedRecord, id: String, created_at: String) -> Self {
        Self {
            id,
            created_at,
            code: record.field("code").to_string(),
            first_name: record.field("firstName").to_string(),
            last_name: record.field("lastName").to_string(),
            plus_one: record.field("plusOne").to_string(),
            guest_name: record.optional_field("guestName"),
            notify: record.field("notify").to_string(),
            email: record.optional_field("email"),
            phone: record.optional_field("phone"),
            diet: record.optional_field("diet"),
            notes: record.optional_field("notes"),
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = concierge_request)]
pub struct ConciergeRequestModel {
    id: String,
    created_at: String,
    full_name: String,
    email: String,
    phone: Option<String>,
    type_of_request: String,
    date: Option<String>,
    time: Option<String>,
    party_size: Option<String>,
    neighborhood: Option<String>,
    budget: Option<String>,
    details: Option<String>,
}

impl ConciergeRequestModel {
    pub fn from_validated(record: &ValidatedRecord, id: String, created_at: String) -> Self {
        Self {
            id,
            created_at,
            full_name: record.field("fullName").to_string(),
            email: record.field("email").to_string(),
            phone: record.optional_field("phone"),
            type_of_request: record.field("typeOfRequest").to_string(),
            date: record.optional_field("date"),
            time: record.optional_field("time"),
            party_size: record.optional_field("partySize"),
            neighborhood: record.optional_field("neighborhood"),
            budget: record.optional_field("budget"),
            details: record.optional_field("details"),
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = application)]
pub struct ApplicationModel {
    id: String,
    created_at: String,
    full_name: String,
    dob: String,
    email: String,
    phone: String,
    address: String,
    city: String,
    state: String,
    country: String,
    company: String,
    industry: String,
    role: String,
    bio: String,
    socials: Option<String>,
    headshot_key: Option<String>,
}

impl ApplicationModel {
    pub fn from_validated(record: &ValidatedRecord, id: String, created_at: String) -> Self {
        Self {
            id,
            created_at,
            full_name: record.field("fullName").to_string(),
            dob: record.field("dob").to_string(),
            email: record.field("email").to_string(),
            phone: record.field("phone").to_string(),
            address: record.field("address").to_string(),
            city: record.field("city").to_string(),
            state: record.field("state").to_string(),
            country: record.field("country").to_string(),
            company: record.field("company").to_string(),
            industry: record.field("industry").to_string(),
            role: record.field("role").to_string(),
            bio: record.field("bio").to_string(),
            socials: record.optional_field("socials"),
            headshot_key: record.optional_field("headshotKey"),
        }
    }
}
