use chronoframe_core::{
    ChronoError, Series, Stype, TimeIndex, TransformFn, Transformation, function_names,
};
use chrono::TimeDelta;
use proptest::prelude::*;

fn double() -> TransformFn {
    TransformFn::new("double", |x: &[f64]| x.iter().map(|v| v * 2.0).collect())
}

fn finite_values() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(-1.0e6f64..1.0e6f64, 0..200)
}

proptest! {
    #[test]
    fn empty_procedure_is_identity_on_arrays(values in finite_values()) {
        let out = Transformation::new().apply(values.clone()).unwrap();
        prop_assert_eq!(out, values);
    }

    #[test]
    fn empty_procedure_is_identity_on_series(values in finite_values()) {
        let index = TimeIndex::duration_range(TimeDelta::hours(1), values.len()).unwrap();
        let series = Series::new(index, values);
        let out = Transformation::new().apply(series.clone()).unwrap();
        prop_assert_eq!(out, series);
    }

    #[test]
    fn length_preserving_steps_never_mismatch(
        values in finite_values(),
        steps in proptest::collection::vec(
            prop::sample::select(vec!["reverse", "sqrt", "log1p", "ln"]),
            0..8,
        ),
        shift in -5i64..5,
    ) {
        let mut t = Transformation::new();
        for name in steps {
            t.add_named(name).unwrap();
        }
        t.add(TransformFn::shift(shift)).add(TransformFn::inverse(1.0));
        let out = t.apply(values.clone()).unwrap();
        prop_assert_eq!(out.len(), values.len());
    }
}

#[test]
fn ln_then_double_in_order() {
    let mut t = Transformation::new();
    t.add(TransformFn::ln()).add(double());
    let out = t.apply(vec![1.0, 10.0, 100.0]).unwrap();
    assert_eq!(out[0], 0.0);
    assert!((out[1] - 10f64.ln() * 2.0).abs() < 1e-12);
    assert!((out[2] - 100f64.ln() * 2.0).abs() < 1e-12);

    let reversed = Transformation::from_procedure(vec![double(), TransformFn::ln()]);
    let other = reversed.apply(vec![1.0, 10.0, 100.0]).unwrap();
    assert!((other[0] - 2f64.ln()).abs() < 1e-12);
    assert_ne!(out, other);
}

#[test]
fn shortening_step_is_a_length_mismatch() {
    let mut t = Transformation::new();
    t.add(TransformFn::ln());
    t.insert(
        1,
        TransformFn::new("head", |x: &[f64]| x.iter().take(1).copied().collect()),
    )
    .unwrap();
    t.add(double());
    let err = t.apply(vec![1.0, 2.0, 3.0]).unwrap_err();
    assert_eq!(
        err,
        ChronoError::LengthMismatch {
            step: 1,
            name: "head".into(),
            expected: 3,
            actual: 1,
        }
    );
}

#[test]
fn positional_edits_are_bounds_checked() {
    let mut t = Transformation::new();
    assert!(matches!(
        t.drop_first(),
        Err(ChronoError::OutOfBounds { position: 0, len: 0 })
    ));
    assert!(matches!(
        t.insert(1, double()),
        Err(ChronoError::OutOfBounds { position: 1, len: 0 })
    ));

    t.insert_first(TransformFn::ln())
        .insert_last(double())
        .insert_first(TransformFn::reverse());
    assert_eq!(
        t.plan(),
        vec![
            (0, "reverse".to_string()),
            (1, "ln".to_string()),
            (2, "double".to_string())
        ]
    );
    assert_eq!(t.drop(1).unwrap().name(), "ln");
    assert_eq!(t.drop_last().unwrap().name(), "double");
    assert_eq!(t.get(0).unwrap().name(), "reverse");
    assert!(t.get(1).is_err());
    t.clear();
    assert!(t.is_empty());
}

#[test]
fn procedure_is_editable_directly() {
    let mut t = Transformation::new();
    t.add(TransformFn::ln());
    t.procedure.push(TransformFn::inverse(1.0));
    assert_eq!(t.size(), 2);
    assert_eq!(t.to_string(), "x -> ln -> inverse(add=1)");
}

#[test]
fn copies_are_independent() {
    let mut a = Transformation::new();
    a.add(TransformFn::ln());
    let mut b = a.copy();
    b.add(double());
    assert_eq!(a.size(), 1);
    assert_eq!(b.size(), 2);
}

#[test]
fn registry_resolves_aliases_and_rejects_unknown() {
    let names = function_names();
    assert!(names.contains(&"log"));
    assert!(names.contains(&"flip"));
    assert_eq!(TransformFn::named("log").unwrap().name(), "ln");
    assert!(matches!(
        TransformFn::named("cube"),
        Err(ChronoError::TypeMismatch(_))
    ));
}

#[test]
fn log_steps_downgrade_ratio_only() {
    let mut t = Transformation::new();
    t.add(TransformFn::ln());
    assert_eq!(t.effect_on(Stype::Ratio), Stype::Interval);
    assert_eq!(t.effect_on(Stype::Binary), Stype::Binary);
}
