use meditrack_core::{
    classify_bmi, classify_bmi_text, compute_bmi, format_blood_pressure_input, BmiCategory,
};

#[test]
fn computes_bmi_with_two_decimals() {
    assert_eq!(compute_bmi("70", "170").as_deref(), Some("24.22"));
    assert_eq!(compute_bmi("80", "200").as_deref(), Some("20.00"));
    assert_eq!(compute_bmi("70.5", "170").as_deref(), Some("24.39"));
}

#[test]
fn rounds_half_away_from_zero_in_fixed_point() {
    // With a height of one metre the BMI equals the weight.
    assert_eq!(compute_bmi("22.345", "100").as_deref(), Some("22.35"));
    assert_eq!(compute_bmi("22.344", "100").as_deref(), Some("22.34"));
}

#[test]
fn missing_or_non_positive_inputs_give_no_bmi() {
    assert_eq!(compute_bmi("0", "170"), None);
    assert_eq!(compute_bmi("70", "0"), None);
    assert_eq!(compute_bmi("", "170"), None);
    assert_eq!(compute_bmi("70", "abc"), None);
    assert_eq!(compute_bmi("-70", "170"), None);
}

#[test]
fn classification_boundaries() {
    assert_eq!(classify_bmi(18.49), BmiCategory::Underweight);
    assert_eq!(classify_bmi(18.5), BmiCategory::Normal);
    assert_eq!(classify_bmi(24.99), BmiCategory::Normal);
    assert_eq!(classify_bmi(25.0), BmiCategory::Overweight);
    assert_eq!(classify_bmi(29.99), BmiCategory::Overweight);
    assert_eq!(classify_bmi(30.0), BmiCategory::ObesityI);
    assert_eq!(classify_bmi(34.99), BmiCategory::ObesityI);
    assert_eq!(classify_bmi(35.0), BmiCategory::ObesityII);
    assert_eq!(classify_bmi(39.99), BmiCategory::ObesityII);
    assert_eq!(classify_bmi(40.0), BmiCategory::ObesityIII);
}

#[test]
fn bands_are_contiguous_and_ordered() {
    let mut previous = classify_bmi(10.0);
    let mut seen = vec![previous];
    for hundredths in 1000..=5000 {
        let current = classify_bmi(f64::from(hundredths) / 100.0);
        assert!(current >= previous, "band order broke at {hundredths}");
        if current != previous {
            seen.push(current);
        }
        previous = current;
    }
    assert_eq!(
        seen,
        vec![
            BmiCategory::Underweight,
            BmiCategory::Normal,
            BmiCategory::Overweight,
            BmiCategory::ObesityI,
            BmiCategory::ObesityII,
            BmiCategory::ObesityIII,
        ]
    );
}

#[test]
fn classifies_text_from_the_bmi_field() {
    assert_eq!(classify_bmi_text(""), None);
    assert_eq!(classify_bmi_text("24.22"), Some(BmiCategory::Normal));
    assert_eq!(
        classify_bmi_text("31.10").map(BmiCategory::label),
        Some("Obesidad grado I")
    );
}

#[test]
fn blood_pressure_mask() {
    assert_eq!(format_blood_pressure_input(""), "");
    assert_eq!(format_blood_pressure_input("12"), "12");
    assert_eq!(format_blood_pressure_input("120"), "120");
    assert_eq!(format_blood_pressure_input("1208"), "120/8");
    assert_eq!(format_blood_pressure_input("120/80"), "120/80");
    assert_eq!(format_blood_pressure_input("12a0 8-0"), "120/80");
    assert_eq!(format_blood_pressure_input("12080999"), "120/809");
}
