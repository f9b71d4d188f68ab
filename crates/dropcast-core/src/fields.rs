//! Display metadata for each feature, as presented by the prediction form.
//!
//! The ranges describe the form widgets only. Nothing here validates a record.

use serde::Serialize;

use crate::record::{FEATURE_COUNT, FEATURE_NAMES};

/// Section of the form a field is shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldGroup {
    Personal,
    Family,
    Application,
    Financial,
    FirstSemester,
    SecondSemester,
    Economic,
}

impl FieldGroup {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Personal => "Personal Information",
            Self::Family => "Family Background",
            Self::Application => "Application Details",
            Self::Financial => "Financial Status",
            Self::FirstSemester => "1st Semester Performance",
            Self::SecondSemester => "2nd Semester Performance",
            Self::Economic => "Economic Indicators",
        }
    }
}

/// Widget description for one feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    /// Trained column name
    pub name: &'static str,
    /// Human-readable label
    pub label: &'static str,
    pub group: FieldGroup,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

const fn field(
    name: &'static str,
    label: &'static str,
    group: FieldGroup,
    min: f64,
    max: f64,
    default: f64,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        group,
        min,
        max,
        default,
    }
}

/// One entry per feature, in trained column order
pub const FIELD_SPECS: [FieldSpec; FEATURE_COUNT] = [
    field("Marital_status", "Marital Status", FieldGroup::Personal, 1.0, 6.0, 1.0),
    field("Application_mode", "Application Mode", FieldGroup::Application, 1.0, 17.0, 1.0),
    field("Application_order", "Application Order", FieldGroup::Application, 0.0, 9.0, 1.0),
    field("Course", "Course Code", FieldGroup::Application, 1.0, 17.0, 1.0),
    field("Daytime_evening_attendance", "Attendance Type", FieldGroup::Application, 0.0, 1.0, 1.0),
    field("Previous_qualification", "Previous Qualification", FieldGroup::Application, 1.0, 17.0, 1.0),
    field("Previous_qualification_grade", "Previous Qualification Grade (0-200)", FieldGroup::Application, 0.0, 200.0, 120.0),
    field("Nacionality", "Nationality Code", FieldGroup::Personal, 1.0, 100.0, 1.0),
    field("Mothers_qualification", "Mother's Qualification", FieldGroup::Family, 1.0, 34.0, 1.0),
    field("Fathers_qualification", "Father's Qualification", FieldGroup::Family, 1.0, 34.0, 1.0),
    field("Mothers_occupation", "Mother's Occupation", FieldGroup::Family, 1.0, 46.0, 1.0),
    field("Fathers_occupation", "Father's Occupation", FieldGroup::Family, 1.0, 46.0, 1.0),
    field("Admission_grade", "Admission Grade (0-200)", FieldGroup::Application, 0.0, 200.0, 120.0),
    field("Displaced", "Displaced Person", FieldGroup::Personal, 0.0, 1.0, 1.0),
    field("Educational_special_needs", "Educational Special Needs", FieldGroup::Personal, 0.0, 1.0, 1.0),
    field("Debtor", "Debtor (Outstanding Tuition)", FieldGroup::Financial, 0.0, 1.0, 1.0),
    field("Tuition_fees_up_to_date", "Tuition Fees Up to Date", FieldGroup::Financial, 0.0, 1.0, 1.0),
    field("Gender", "Gender", FieldGroup::Personal, 0.0, 1.0, 1.0),
    field("Scholarship_holder", "Scholarship Holder", FieldGroup::Financial, 0.0, 1.0, 1.0),
    field("Age_at_enrollment", "Age at Enrollment", FieldGroup::Personal, 16.0, 70.0, 20.0),
    field("International", "International Student", FieldGroup::Personal, 0.0, 1.0, 1.0),
    field("Curricular_units_1st_sem_credited", "1st Sem Units Credited", FieldGroup::FirstSemester, 0.0, 20.0, 0.0),
    field("Curricular_units_1st_sem_enrolled", "1st Sem Units Enrolled", FieldGroup::FirstSemester, 0.0, 20.0, 6.0),
    field("Curricular_units_1st_sem_evaluations", "1st Sem Units Evaluations", FieldGroup::FirstSemester, 0.0, 20.0, 6.0),
    field("Curricular_units_1st_sem_approved", "1st Sem Units Approved", FieldGroup::FirstSemester, 0.0, 20.0, 5.0),
    field("Curricular_units_1st_sem_grade", "1st Sem Grade (0-20)", FieldGroup::FirstSemester, 0.0, 20.0, 12.0),
    field("Curricular_units_1st_sem_without_evaluations", "1st Sem Units Without Evaluations", FieldGroup::FirstSemester, 0.0, 20.0, 0.0),
    field("Curricular_units_2nd_sem_credited", "2nd Sem Units Credited", FieldGroup::SecondSemester, 0.0, 20.0, 0.0),
    field("Curricular_units_2nd_sem_enrolled", "2nd Sem Units Enrolled", FieldGroup::SecondSemester, 0.0, 20.0, 6.0),
    field("Curricular_units_2nd_sem_evaluations", "2nd Sem Units Evaluations", FieldGroup::SecondSemester, 0.0, 20.0, 6.0),
    field("Curricular_units_2nd_sem_approved", "2nd Sem Units Approved", FieldGroup::SecondSemester, 0.0, 20.0, 5.0),
    field("Curricular_units_2nd_sem_grade", "2nd Sem Grade (0-20)", FieldGroup::SecondSemester, 0.0, 20.0, 12.0),
    field("Curricular_units_2nd_sem_without_evaluations", "2nd Sem Units Without Evaluations", FieldGroup::SecondSemester, 0.0, 20.0, 0.0),
    field("Unemployment_rate", "Unemployment Rate (%)", FieldGroup::Economic, 0.0, 100.0, 7.6),
    field("Inflation_rate", "Inflation Rate (%)", FieldGroup::Economic, 0.0, 100.0, 1.5),
    field("GDP", "GDP ($)", FieldGroup::Economic, 0.0, 1000000.0, 19000.0),
];

/// Look up the widget description for a trained column name
pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    FIELD_SPECS.iter().find(|spec| spec.name == name)
}

/// Field specs belonging to one form section
pub fn fields_in(group: FieldGroup) -> impl Iterator<Item = &'static FieldSpec> {
    FIELD_SPECS.iter().filter(move |spec| spec.group == group)
}

/// Debug check that the catalogue lines up with the trained order
pub fn catalogue_matches_schema() -> bool {
    FIELD_SPECS
        .iter()
        .zip(FEATURE_NAMES.iter())
        .all(|(spec, name)| spec.name == *name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FeatureRecord;

    #[test]
    fn test_catalogue_order() {
        assert!(catalogue_matches_schema());
    }

    #[test]
    fn test_defaults_match_record_defaults() {
        let record = FeatureRecord::default();
        for spec in FIELD_SPECS.iter() {
            assert_eq!(record.get(spec.name), Some(spec.default), "{}", spec.name);
        }
    }

    #[test]
    fn test_defaults_inside_ranges() {
        for spec in FIELD_SPECS.iter() {
            assert!(spec.min <= spec.default && spec.default <= spec.max, "{}", spec.name);
        }
    }

    #[test]
    fn test_groups() {
        assert_eq!(fields_in(FieldGroup::Family).count(), 4);
        assert_eq!(fields_in(FieldGroup::FirstSemester).count(), 6);
        assert_eq!(field_spec("GDP").map(|s| s.group), Some(FieldGroup::Economic));
        assert!(field_spec("Shoe_size").is_none());
    }
}
