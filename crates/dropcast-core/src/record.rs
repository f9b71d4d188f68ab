//! The student feature record and its trained column order

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::FeatureFrame;

/// Number of features the classifier was trained on
pub const FEATURE_COUNT: usize = 36;

/// Feature names in the exact order the classifier was trained on.
///
/// The spelling is fixed at training time (including `Nacionality`).
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Marital_status",
    "Application_mode",
    "Application_order",
    "Course",
    "Daytime_evening_attendance",
    "Previous_qualification",
    "Previous_qualification_grade",
    "Nacionality",
    "Mothers_qualification",
    "Fathers_qualification",
    "Mothers_occupation",
    "Fathers_occupation",
    "Admission_grade",
    "Displaced",
    "Educational_special_needs",
    "Debtor",
    "Tuition_fees_up_to_date",
    "Gender",
    "Scholarship_holder",
    "Age_at_enrollment",
    "International",
    "Curricular_units_1st_sem_credited",
    "Curricular_units_1st_sem_enrolled",
    "Curricular_units_1st_sem_evaluations",
    "Curricular_units_1st_sem_approved",
    "Curricular_units_1st_sem_grade",
    "Curricular_units_1st_sem_without_evaluations",
    "Curricular_units_2nd_sem_credited",
    "Curricular_units_2nd_sem_enrolled",
    "Curricular_units_2nd_sem_evaluations",
    "Curricular_units_2nd_sem_approved",
    "Curricular_units_2nd_sem_grade",
    "Curricular_units_2nd_sem_without_evaluations",
    "Unemployment_rate",
    "Inflation_rate",
    "GDP",
];

/// One student's inputs for a single prediction.
///
/// Categorical attributes are carried as their small integer codes. Every
/// field is required when deserializing, so a record is always complete.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(rename = "Marital_status")]
    pub marital_status: f64,
    #[serde(rename = "Application_mode")]
    pub application_mode: f64,
    #[serde(rename = "Application_order")]
    pub application_order: f64,
    #[serde(rename = "Course")]
    pub course: f64,
    #[serde(rename = "Daytime_evening_attendance")]
    pub daytime_evening_attendance: f64,
    #[serde(rename = "Previous_qualification")]
    pub previous_qualification: f64,
    #[serde(rename = "Previous_qualification_grade")]
    pub previous_qualification_grade: f64,
    #[serde(rename = "Nacionality")]
    pub nationality: f64,
    #[serde(rename = "Mothers_qualification")]
    pub mothers_qualification: f64,
    #[serde(rename = "Fathers_qualification")]
    pub fathers_qualification: f64,
    #[serde(rename = "Mothers_occupation")]
    pub mothers_occupation: f64,
    #[serde(rename = "Fathers_occupation")]
    pub fathers_occupation: f64,
    #[serde(rename = "Admission_grade")]
    pub admission_grade: f64,
    #[serde(rename = "Displaced")]
    pub displaced: f64,
    #[serde(rename = "Educational_special_needs")]
    pub educational_special_needs: f64,
    #[serde(rename = "Debtor")]
    pub debtor: f64,
    #[serde(rename = "Tuition_fees_up_to_date")]
    pub tuition_fees_up_to_date: f64,
    #[serde(rename = "Gender")]
    pub gender: f64,
    #[serde(rename = "Scholarship_holder")]
    pub scholarship_holder: f64,
    #[serde(rename = "Age_at_enrollment")]
    pub age_at_enrollment: f64,
    #[serde(rename = "International")]
    pub international: f64,
    #[serde(rename = "Curricular_units_1st_sem_credited")]
    pub curricular_units_1st_sem_credited: f64,
    #[serde(rename = "Curricular_units_1st_sem_enrolled")]
    pub curricular_units_1st_sem_enrolled: f64,
    #[serde(rename = "Curricular_units_1st_sem_evaluations")]
    pub curricular_units_1st_sem_evaluations: f64,
    #[serde(rename = "Curricular_units_1st_sem_approved")]
    pub curricular_units_1st_sem_approved: f64,
    #[serde(rename = "Curricular_units_1st_sem_grade")]
    pub curricular_units_1st_sem_grade: f64,
    #[serde(rename = "Curricular_units_1st_sem_without_evaluations")]
    pub curricular_units_1st_sem_without_evaluations: f64,
    #[serde(rename = "Curricular_units_2nd_sem_credited")]
    pub curricular_units_2nd_sem_credited: f64,
    #[serde(rename = "Curricular_units_2nd_sem_enrolled")]
    pub curricular_units_2nd_sem_enrolled: f64,
    #[serde(rename = "Curricular_units_2nd_sem_evaluations")]
    pub curricular_units_2nd_sem_evaluations: f64,
    #[serde(rename = "Curricular_units_2nd_sem_approved")]
    pub curricular_units_2nd_sem_approved: f64,
    #[serde(rename = "Curricular_units_2nd_sem_grade")]
    pub curricular_units_2nd_sem_grade: f64,
    #[serde(rename = "Curricular_units_2nd_sem_without_evaluations")]
    pub curricular_units_2nd_sem_without_evaluations: f64,
    #[serde(rename = "Unemployment_rate")]
    pub unemployment_rate: f64,
    #[serde(rename = "Inflation_rate")]
    pub inflation_rate: f64,
    #[serde(rename = "GDP")]
    pub gdp: f64,
}

impl Default for FeatureRecord {
    /// Defaults used by the prediction form
    fn default() -> Self {
        Self {
            marital_status: 1.0,
            application_mode: 1.0,
            application_order: 1.0,
            course: 1.0,
            daytime_evening_attendance: 1.0,
            previous_qualification: 1.0,
            previous_qualification_grade: 120.0,
            nationality: 1.0,
            mothers_qualification: 1.0,
            fathers_qualification: 1.0,
            mothers_occupation: 1.0,
            fathers_occupation: 1.0,
            admission_grade: 120.0,
            displaced: 1.0,
            educational_special_needs: 1.0,
            debtor: 1.0,
            tuition_fees_up_to_date: 1.0,
            gender: 1.0,
            scholarship_holder: 1.0,
            age_at_enrollment: 20.0,
            international: 1.0,
            curricular_units_1st_sem_credited: 0.0,
            curricular_units_1st_sem_enrolled: 6.0,
            curricular_units_1st_sem_evaluations: 6.0,
            curricular_units_1st_sem_approved: 5.0,
            curricular_units_1st_sem_grade: 12.0,
            curricular_units_1st_sem_without_evaluations: 0.0,
            curricular_units_2nd_sem_credited: 0.0,
            curricular_units_2nd_sem_enrolled: 6.0,
            curricular_units_2nd_sem_evaluations: 6.0,
            curricular_units_2nd_sem_approved: 5.0,
            curricular_units_2nd_sem_grade: 12.0,
            curricular_units_2nd_sem_without_evaluations: 0.0,
            unemployment_rate: 7.6,
            inflation_rate: 1.5,
            gdp: 19000.0,
        }
    }
}

impl FeatureRecord {
    /// Values in trained column order
    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        [
            self.marital_status,
            self.application_mode,
            self.application_order,
            self.course,
            self.daytime_evening_attendance,
            self.previous_qualification,
            self.previous_qualification_grade,
            self.nationality,
            self.mothers_qualification,
            self.fathers_qualification,
            self.mothers_occupation,
            self.fathers_occupation,
            self.admission_grade,
            self.displaced,
            self.educational_special_needs,
            self.debtor,
            self.tuition_fees_up_to_date,
            self.gender,
            self.scholarship_holder,
            self.age_at_enrollment,
            self.international,
            self.curricular_units_1st_sem_credited,
            self.curricular_units_1st_sem_enrolled,
            self.curricular_units_1st_sem_evaluations,
            self.curricular_units_1st_sem_approved,
            self.curricular_units_1st_sem_grade,
            self.curricular_units_1st_sem_without_evaluations,
            self.curricular_units_2nd_sem_credited,
            self.curricular_units_2nd_sem_enrolled,
            self.curricular_units_2nd_sem_evaluations,
            self.curricular_units_2nd_sem_approved,
            self.curricular_units_2nd_sem_grade,
            self.curricular_units_2nd_sem_without_evaluations,
            self.unemployment_rate,
            self.inflation_rate,
            self.gdp,
        ]
    }

    /// Named mapping from trained column name to value
    pub fn to_mapping(&self) -> HashMap<String, f64> {
        FEATURE_NAMES
            .iter()
            .zip(self.values())
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }

    /// Single-row frame with columns in trained order
    pub fn to_frame(&self) -> FeatureFrame {
        FeatureFrame::from_pairs(
            FEATURE_NAMES
                .iter()
                .zip(self.values())
                .map(|(name, value)| (name.to_string(), value)),
        )
    }

    /// Look up a field by its trained column name
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(|idx| self.values()[idx])
    }

    /// Mutable access to a field by its trained column name
    pub fn field_mut(&mut self, name: &str) -> Option<&mut f64> {
        let field = match name {
            "Marital_status" => &mut self.marital_status,
            "Application_mode" => &mut self.application_mode,
            "Application_order" => &mut self.application_order,
            "Course" => &mut self.course,
            "Daytime_evening_attendance" => &mut self.daytime_evening_attendance,
            "Previous_qualification" => &mut self.previous_qualification,
            "Previous_qualification_grade" => &mut self.previous_qualification_grade,
            "Nacionality" => &mut self.nationality,
            "Mothers_qualification" => &mut self.mothers_qualification,
            "Fathers_qualification" => &mut self.fathers_qualification,
            "Mothers_occupation" => &mut self.mothers_occupation,
            "Fathers_occupation" => &mut self.fathers_occupation,
            "Admission_grade" => &mut self.admission_grade,
            "Displaced" => &mut self.displaced,
            "Educational_special_needs" => &mut self.educational_special_needs,
            "Debtor" => &mut self.debtor,
            "Tuition_fees_up_to_date" => &mut self.tuition_fees_up_to_date,
            "Gender" => &mut self.gender,
            "Scholarship_holder" => &mut self.scholarship_holder,
            "Age_at_enrollment" => &mut self.age_at_enrollment,
            "International" => &mut self.international,
            "Curricular_units_1st_sem_credited" => &mut self.curricular_units_1st_sem_credited,
            "Curricular_units_1st_sem_enrolled" => &mut self.curricular_units_1st_sem_enrolled,
            "Curricular_units_1st_sem_evaluations" => &mut self.curricular_units_1st_sem_evaluations,
            "Curricular_units_1st_sem_approved" => &mut self.curricular_units_1st_sem_approved,
            "Curricular_units_1st_sem_grade" => &mut self.curricular_units_1st_sem_grade,
            "Curricular_units_1st_sem_without_evaluations" => &mut self.curricular_units_1st_sem_without_evaluations,
            "Curricular_units_2nd_sem_credited" => &mut self.curricular_units_2nd_sem_credited,
            "Curricular_units_2nd_sem_enrolled" => &mut self.curricular_units_2nd_sem_enrolled,
            "Curricular_units_2nd_sem_evaluations" => &mut self.curricular_units_2nd_sem_evaluations,
            "Curricular_units_2nd_sem_approved" => &mut self.curricular_units_2nd_sem_approved,
            "Curricular_units_2nd_sem_grade" => &mut self.curricular_units_2nd_sem_grade,
            "Curricular_units_2nd_sem_without_evaluations" => &mut self.curricular_units_2nd_sem_without_evaluations,
            "Unemployment_rate" => &mut self.unemployment_rate,
            "Inflation_rate" => &mut self.inflation_rate,
            "GDP" => &mut self.gdp,
            _ => return None,
        };
        Some(field)
    }

    /// Set a field by its trained column name, returning `false` if the name is unknown
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        match self.field_mut(name) {
            Some(field) => {
                *field = value;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        let mut names = FEATURE_NAMES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_values_follow_trained_order() {
        let mut record = FeatureRecord::default();
        record.marital_status = 4.0;
        record.gdp = 1.79;

        let values = record.values();
        assert_eq!(values[0], 4.0);
        assert_eq!(values[FEATURE_COUNT - 1], 1.79);
        assert_eq!(record.get("Marital_status"), Some(4.0));
        assert_eq!(record.get("GDP"), Some(1.79));
    }

    #[test]
    fn test_set_by_name() {
        let mut record = FeatureRecord::default();
        assert!(record.set("Curricular_units_2nd_sem_approved", 0.0));
        assert_eq!(record.curricular_units_2nd_sem_approved, 0.0);
        assert!(!record.set("Shoe_size", 44.0));
    }

    #[test]
    fn test_every_name_is_addressable() {
        let mut record = FeatureRecord::default();
        for (idx, name) in FEATURE_NAMES.iter().enumerate() {
            assert!(record.set(name, idx as f64), "unknown field {}", name);
        }
        let expected: Vec<f64> = (0..FEATURE_COUNT).map(|idx| idx as f64).collect();
        assert_eq!(record.values().to_vec(), expected);
    }

    #[test]
    fn test_serde_uses_trained_names() {
        let record = FeatureRecord::default();
        let json = serde_json::to_value(record).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), FEATURE_COUNT);
        assert_eq!(object["Nacionality"], 1.0);
        assert_eq!(object["Admission_grade"], 120.0);

        let back: FeatureRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let mut json = serde_json::to_value(FeatureRecord::default()).unwrap();
        json.as_object_mut().unwrap().remove("Debtor");
        assert!(serde_json::from_value::<FeatureRecord>(json).is_err());
    }

    #[test]
    fn test_frame_and_mapping_agree() {
        let record = FeatureRecord::default();
        let frame = record.to_frame();
        let mapping = record.to_mapping();

        assert_eq!(frame.num_rows(), 1);
        for (name, value) in frame.columns().iter().zip(frame.row(0).unwrap()) {
            assert_eq!(mapping[name], *value);
        }
    }
}
