//! User payloads accepted by the user tools and sent to the user service

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Postal address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub country: String,
    pub city: String,
    pub street: String,
    pub flat_house: String,
}

/// Payment card details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCard {
    pub num: String,
    pub cvv: String,
    pub exp_date: String,
}

/// Gender filter accepted by the search tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// New user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub surname: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    pub about_me: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card: Option<CreditCard>,
}

/// Partial user update; absent fields are left untouched by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_me: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card: Option<CreditCard>,
}

/// Search filters; every filter is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserSearch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

impl UserSearch {
    /// Query-string pairs for the filters that are set
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(name) = &self.name {
            pairs.push(("name", name.clone()));
        }
        if let Some(surname) = &self.surname {
            pairs.push(("surname", surname.clone()));
        }
        if let Some(email) = &self.email {
            pairs.push(("email", email.clone()));
        }
        if let Some(gender) = self.gender {
            pairs.push(("gender", gender.as_str().to_string()));
        }
        pairs
    }
}

fn address_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "country": { "type": "string" },
            "city": { "type": "string" },
            "street": { "type": "string" },
            "flat_house": { "type": "string" }
        },
        "required": ["country", "city", "street", "flat_house"]
    })
}

fn credit_card_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "num": { "type": "string" },
            "cvv": { "type": "string" },
            "exp_date": { "type": "string" }
        },
        "required": ["num", "cvv", "exp_date"]
    })
}

fn user_properties() -> Value {
    json!({
        "name": { "type": "string", "description": "User name" },
        "surname": { "type": "string", "description": "User surname" },
        "email": { "type": "string", "description": "User email" },
        "phone": { "type": "string", "description": "Phone number" },
        "date_of_birth": { "type": "string", "description": "Date of birth, YYYY-MM-DD" },
        "address": address_schema(),
        "gender": { "type": "string", "description": "User gender" },
        "company": { "type": "string", "description": "Employer" },
        "salary": { "type": "number", "description": "Yearly salary" },
        "about_me": { "type": "string", "description": "Free-form description of the user" },
        "credit_card": credit_card_schema()
    })
}

impl UserCreate {
    /// JSON schema advertised by `add_user`
    pub fn schema() -> Value {
        json!({
            "title": "UserCreate",
            "type": "object",
            "properties": user_properties(),
            "required": ["name", "surname", "email", "about_me"]
        })
    }
}

impl UserUpdate {
    /// JSON schema for the `new_info` argument of `update_user`
    pub fn schema() -> Value {
        json!({
            "title": "UserUpdate",
            "type": "object",
            "properties": user_properties()
        })
    }
}

impl UserSearch {
    /// JSON schema advertised by `search_users`
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "User name" },
                "surname": { "type": "string", "description": "User surname" },
                "email": { "type": "string", "description": "User email" },
                "gender": {
                    "type": "string",
                    "description": "User gender",
                    "enum": ["male", "female"]
                }
            },
            "required": []
        })
    }
}
