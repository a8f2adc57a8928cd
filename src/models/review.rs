// src/models/review.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use super::options;

/// Multipart field carrying the optional image.
pub const IMAGE_FIELD: &str = "image";

/// The ten required survey fields, in the order the form renders them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReviewField {
    Age,
    Job,
    Sector,
    MonthlyIncome,
    Gender,
    CivilState,
    FamilyMembers,
    VehicleType,
    VehicleBrand,
    FuelType,
}

/// How a field's raw text is interpreted.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FieldKind {
    /// Whole number with an inclusive lower bound.
    Integer { min: u32 },
    Decimal,
    Choice(&'static [&'static str]),
}

impl ReviewField {
    pub const ALL: [ReviewField; 10] = [
        ReviewField::Age,
        ReviewField::Job,
        ReviewField::Sector,
        ReviewField::MonthlyIncome,
        ReviewField::Gender,
        ReviewField::CivilState,
        ReviewField::FamilyMembers,
        ReviewField::VehicleType,
        ReviewField::VehicleBrand,
        ReviewField::FuelType,
    ];

    /// Name used on the wire, both as multipart field name and JSON key.
    pub fn name(self) -> &'static str {
        match self {
            ReviewField::Age => "age",
            ReviewField::Job => "job",
            ReviewField::Sector => "sector",
            ReviewField::MonthlyIncome => "monthlyIncome",
            ReviewField::Gender => "gender",
            ReviewField::CivilState => "civilState",
            ReviewField::FamilyMembers => "familyMembers",
            ReviewField::VehicleType => "vehicleType",
            ReviewField::VehicleBrand => "vehicleBrand",
            ReviewField::FuelType => "fuelType",
        }
    }

    /// Placeholder for numeric inputs, disabled prompt option for selects.
    pub fn prompt(self) -> &'static str {
        match self {
            ReviewField::Age => "Age",
            ReviewField::Job => "Select your job.",
            ReviewField::Sector => "Work in Government or Private Sector.",
            ReviewField::MonthlyIncome => "Monthly Income",
            ReviewField::Gender => "Select Gender",
            ReviewField::CivilState => "Select civil state",
            ReviewField::FamilyMembers => "Number of Family Members",
            ReviewField::VehicleType => "Select vehicle type you drive or like.",
            ReviewField::VehicleBrand => "Select Vehicle brand you drive or like.",
            ReviewField::FuelType => "Fuel type.",
        }
    }

    /// Short column heading for the review list.
    pub fn heading(self) -> &'static str {
        match self {
            ReviewField::Age => "Age",
            ReviewField::Job => "Job",
            ReviewField::Sector => "Sector",
            ReviewField::MonthlyIncome => "Income",
            ReviewField::Gender => "Gender",
            ReviewField::CivilState => "Civil state",
            ReviewField::FamilyMembers => "Family",
            ReviewField::VehicleType => "Vehicle",
            ReviewField::VehicleBrand => "Brand",
            ReviewField::FuelType => "Fuel",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            ReviewField::Age => FieldKind::Integer { min: 1 },
            ReviewField::FamilyMembers => FieldKind::Integer { min: 0 },
            ReviewField::MonthlyIncome => FieldKind::Decimal,
            ReviewField::Job => FieldKind::Choice(options::JOBS),
            ReviewField::Sector => FieldKind::Choice(options::SECTORS),
            ReviewField::Gender => FieldKind::Choice(options::GENDERS),
            ReviewField::CivilState => FieldKind::Choice(options::CIVIL_STATES),
            ReviewField::VehicleType => FieldKind::Choice(options::VEHICLE_TYPES),
            ReviewField::VehicleBrand => FieldKind::Choice(options::VEHICLE_BRANDS),
            ReviewField::FuelType => FieldKind::Choice(options::FUEL_TYPES),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("`{0}` is required")]
    Missing(&'static str),
    #[error("`{field}` must be {expected}")]
    Invalid {
        field: &'static str,
        expected: &'static str,
    },
}

impl FieldError {
    pub fn field(&self) -> &'static str {
        match self {
            FieldError::Missing(field) => field,
            FieldError::Invalid { field, .. } => field,
        }
    }
}

/// A submission that passed validation and can be persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub age: u32,
    pub job: String,
    pub sector: String,
    pub monthly_income: f64,
    pub gender: String,
    pub civil_state: String,
    pub family_members: u32,
    pub vehicle_type: String,
    pub vehicle_brand: String,
    pub fuel_type: String,
}

impl NewReview {
    /// Validates raw text fields keyed by wire name.
    ///
    /// Every field is checked, so the error list names all offending
    /// fields at once. Categorical values only need to be non-empty.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let age = integer(fields, ReviewField::Age, &mut errors);
        let job = text(fields, ReviewField::Job, &mut errors);
        let sector = text(fields, ReviewField::Sector, &mut errors);
        let monthly_income = decimal(fields, ReviewField::MonthlyIncome, &mut errors);
        let gender = text(fields, ReviewField::Gender, &mut errors);
        let civil_state = text(fields, ReviewField::CivilState, &mut errors);
        let family_members = integer(fields, ReviewField::FamilyMembers, &mut errors);
        let vehicle_type = text(fields, ReviewField::VehicleType, &mut errors);
        let vehicle_brand = text(fields, ReviewField::VehicleBrand, &mut errors);
        let fuel_type = text(fields, ReviewField::FuelType, &mut errors);

        if let (
            Some(age),
            Some(job),
            Some(sector),
            Some(monthly_income),
            Some(gender),
            Some(civil_state),
            Some(family_members),
            Some(vehicle_type),
            Some(vehicle_brand),
            Some(fuel_type),
        ) = (
            age,
            job,
            sector,
            monthly_income,
            gender,
            civil_state,
            family_members,
            vehicle_type,
            vehicle_brand,
            fuel_type,
        ) {
            return Ok(NewReview {
                age,
                job,
                sector,
                monthly_income,
                gender,
                civil_state,
                family_members,
                vehicle_type,
                vehicle_brand,
                fuel_type,
            });
        }

        Err(errors)
    }
}

fn required<'a>(
    fields: &'a HashMap<String, String>,
    field: ReviewField,
    errors: &mut Vec<FieldError>,
) -> Option<&'a str> {
    let value = fields
        .get(field.name())
        .map(|value| value.trim())
        .filter(|value| !value.is_empty());
    if value.is_none() {
        errors.push(FieldError::Missing(field.name()));
    }
    value
}

fn text(
    fields: &HashMap<String, String>,
    field: ReviewField,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    required(fields, field, errors).map(str::to_string)
}

fn integer(
    fields: &HashMap<String, String>,
    field: ReviewField,
    errors: &mut Vec<FieldError>,
) -> Option<u32> {
    let raw = required(fields, field, errors)?;
    let min = match field.kind() {
        FieldKind::Integer { min } => min,
        _ => 0,
    };
    match raw.parse::<u32>() {
        Ok(value) if value >= min => Some(value),
        _ => {
            errors.push(FieldError::Invalid {
                field: field.name(),
                expected: if min > 0 {
                    "a positive integer"
                } else {
                    "a non-negative integer"
                },
            });
            None
        }
    }
}

fn decimal(
    fields: &HashMap<String, String>,
    field: ReviewField,
    errors: &mut Vec<FieldError>,
) -> Option<f64> {
    let raw = required(fields, field, errors)?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            errors.push(FieldError::Invalid {
                field: field.name(),
                expected: "a number",
            });
            None
        }
    }
}

/// A persisted survey answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,            // Generated at creation, never changes
    #[serde(flatten)]
    pub fields: NewReview,
    pub image: Option<String>, // Reference path of the uploaded image, if any
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn new(fields: NewReview, image: Option<String>, now: DateTime<Utc>) -> Self {
        Review {
            id: Uuid::new_v4().to_string(),
            fields,
            image,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Review {
    /// Display text for one survey field in the review list.
    pub fn display_value(&self, field: ReviewField) -> String {
        let fields = &self.fields;
        match field {
            ReviewField::Age => fields.age.to_string(),
            ReviewField::Job => fields.job.clone(),
            ReviewField::Sector => fields.sector.clone(),
            ReviewField::MonthlyIncome => fields.monthly_income.to_string(),
            ReviewField::Gender => fields.gender.clone(),
            ReviewField::CivilState => fields.civil_state.clone(),
            ReviewField::FamilyMembers => fields.family_members.to_string(),
            ReviewField::VehicleType => fields.vehicle_type.clone(),
            ReviewField::VehicleBrand => fields.vehicle_brand.clone(),
            ReviewField::FuelType => fields.fuel_type.clone(),
        }
    }
}

/// String-valued form state, one entry per [`ReviewField`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    values: [String; 10],
}

impl ReviewDraft {
    pub fn get(&self, field: ReviewField) -> &str {
        &self.values[field as usize]
    }

    pub fn set(&mut self, field: ReviewField, value: impl Into<String>) {
        self.values[field as usize] = value.into();
    }

    pub fn clear(&mut self) {
        *self = ReviewDraft::default();
    }

    /// `(wire name, value)` pairs in form order, as sent in the multipart body.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        ReviewField::ALL
            .into_iter()
            .map(move |field| (field.name(), self.get(field)))
    }

    pub fn to_fields(&self) -> HashMap<String, String> {
        self.entries()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engineer_fields() -> HashMap<String, String> {
        [
            ("age", "30"),
            ("job", "Engineer"),
            ("sector", "Private"),
            ("monthlyIncome", "5000"),
            ("gender", "Male"),
            ("civilState", "Married"),
            ("familyMembers", "3"),
            ("vehicleType", "Car"),
            ("vehicleBrand", "Toyota"),
            ("fuelType", "Petrol"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_valid_fields_are_parsed() {
        let review = NewReview::from_fields(&engineer_fields()).unwrap();
        assert_eq!(review.age, 30);
        assert_eq!(review.job, "Engineer");
        assert_eq!(review.monthly_income, 5000.0);
        assert_eq!(review.family_members, 3);
        assert_eq!(review.fuel_type, "Petrol");
    }

    #[test]
    fn test_each_missing_field_is_reported() {
        for field in ReviewField::ALL {
            let mut fields = engineer_fields();
            fields.remove(field.name());
            let errors = NewReview::from_fields(&fields).unwrap_err();
            assert_eq!(errors, vec![FieldError::Missing(field.name())]);
        }
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let mut fields = engineer_fields();
        fields.insert("job".into(), "   ".into());
        fields.insert("age".into(), String::new());
        let errors = NewReview::from_fields(&fields).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&FieldError::Missing("job")));
        assert!(errors.contains(&FieldError::Missing("age")));
    }

    #[test]
    fn test_numeric_bounds() {
        let mut fields = engineer_fields();
        fields.insert("age".into(), "0".into());
        fields.insert("familyMembers".into(), "-1".into());
        fields.insert("monthlyIncome".into(), "lots".into());
        let errors = NewReview::from_fields(&fields).unwrap_err();
        let names: Vec<_> = errors.iter().map(FieldError::field).collect();
        assert_eq!(names, vec!["age", "monthlyIncome", "familyMembers"]);

        let mut fields = engineer_fields();
        fields.insert("familyMembers".into(), "0".into());
        fields.insert("monthlyIncome".into(), " 1234.5 ".into());
        let review = NewReview::from_fields(&fields).unwrap();
        assert_eq!(review.family_members, 0);
        assert_eq!(review.monthly_income, 1234.5);
    }

    #[test]
    fn test_non_finite_income_is_rejected() {
        let mut fields = engineer_fields();
        fields.insert("monthlyIncome".into(), "NaN".into());
        let errors = NewReview::from_fields(&fields).unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError::Invalid {
                field: "monthlyIncome",
                expected: "a number"
            }]
        );
    }

    #[test]
    fn test_draft_feeds_validation() {
        let mut draft = ReviewDraft::default();
        for (name, value) in engineer_fields() {
            draft.set(ReviewField::from_name(&name).unwrap(), value);
        }
        assert_eq!(draft.get(ReviewField::VehicleBrand), "Toyota");
        let order: Vec<_> = draft.entries().map(|(name, _)| name).collect();
        assert_eq!(order.first(), Some(&"age"));
        assert_eq!(order.last(), Some(&"fuelType"));
        assert!(NewReview::from_fields(&draft.to_fields()).is_ok());

        draft.clear();
        assert_eq!(draft, ReviewDraft::default());
        assert_eq!(
            NewReview::from_fields(&draft.to_fields()).unwrap_err().len(),
            10
        );
    }

    #[test]
    fn test_review_serializes_with_camel_case_keys() {
        let fields = NewReview::from_fields(&engineer_fields()).unwrap();
        let review = Review::new(fields, None, Utc::now());
        let json = serde_json::to_value(&review).unwrap();
        assert_eq!(json["monthlyIncome"], 5000.0);
        assert_eq!(json["civilState"], "Married");
        assert!(json["image"].is_null());
        assert!(json.get("createdAt").is_some());
        let back: Review = serde_json::from_value(json).unwrap();
        assert_eq!(back, review);
    }

    #[test]
    fn test_display_values_match_submission() {
        let mut fields = engineer_fields();
        fields.insert("monthlyIncome".into(), "5250.75".into());
        let review = Review::new(NewReview::from_fields(&fields).unwrap(), None, Utc::now());
        assert_eq!(review.display_value(ReviewField::Age), "30");
        assert_eq!(review.display_value(ReviewField::MonthlyIncome), "5250.75");
        assert_eq!(review.display_value(ReviewField::VehicleBrand), "Toyota");
    }

    #[test]
    fn test_choice_fields_have_options() {
        for field in ReviewField::ALL {
            if let FieldKind::Choice(options) = field.kind() {
                assert!(!options.is_empty(), "{} has no options", field.name());
            }
        }
        assert_eq!(ReviewField::from_name("civilState"), Some(ReviewField::CivilState));
        assert_eq!(ReviewField::from_name("image"), None);
    }
}
