use chrono::{NaiveDate, TimeDelta};
use featurespace::prelude::*;

#[test]
fn unknown_feature_is_an_error() {
    let constraints = Constraints::new(vec![Rule::new("x", Op::Ge(0.into()))]);
    assert!(matches!(
        constraint_to_distribution(&constraints, "y"),
        Err(Error::UnknownConstraintKind { feature }) if feature == "y"
    ));
}

#[test]
fn rules_without_kind_marker_fall_back_to_float() {
    let constraints = Constraints::new(vec![
        Rule::new("x", Op::Ge(1.into())),
        Rule::new("x", Op::Le(4.into())),
    ]);
    let dist = constraint_to_distribution(&constraints, "x").unwrap();
    let Distribution::Float(float) = &dist else {
        panic!("expected a float distribution, got {}", dist.kind());
    };
    assert_eq!(float.get(), ("x", 1.0, 4.0));
}

#[test]
fn strict_integer_bounds_move_inward() {
    let constraints = Constraints::new(vec![
        Rule::new("n", Op::Gt(0.into())),
        Rule::new("n", Op::Lt(10.into())),
        Rule::new("n", Op::Dtype("int32".into())),
    ]);
    let dist = constraint_to_distribution(&constraints, "n").unwrap();
    assert_eq!(dist.min(), Value::from(1));
    assert_eq!(dist.max(), Value::from(9));
}

#[test]
fn datetime_rules_build_datetime_distribution() {
    let low = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let high = low + TimeDelta::days(30);
    let constraints = Constraints::new(vec![
        Rule::new("t", Op::Ge(low.into())),
        Rule::new("t", Op::Lt(high.into())),
        Rule::new("t", Op::Dtype("datetime64[ns]".into())),
    ]);
    let dist = constraint_to_distribution(&constraints, "t").unwrap();
    let Distribution::Datetime(dt) = &dist else {
        panic!("expected a datetime distribution, got {}", dist.kind());
    };
    assert_eq!(dt.low(), low);
    assert_eq!(dt.high(), high - TimeDelta::microseconds(1));
    assert_eq!(dt.step(), TimeDelta::microseconds(1));
    assert_eq!(dt.offset(), TimeDelta::seconds(120));
}

#[test]
fn contradictory_bounds_surface_the_range_error() {
    let constraints = Constraints::new(vec![
        Rule::new("x", Op::Ge(5.into())),
        Rule::new("x", Op::Le(1.into())),
    ]);
    assert!(matches!(
        constraint_to_distribution(&constraints, "x"),
        Err(Error::InvalidRange { .. })
    ));
}

#[test]
fn merged_constraints_rebuild_each_feature() {
    let age = IntegerDistribution::builder("age").bounds(18, 99).build().unwrap();
    let plan = CategoricalDistribution::builder("plan").choices(["free", "pro"]).build().unwrap();

    let mut constraints = age.as_constraint();
    constraints.merge(plan.as_constraint());
    assert_eq!(constraints.features(), vec!["age", "plan"]);

    assert_eq!(
        constraint_to_distribution(&constraints, "age").unwrap(),
        Distribution::from(age)
    );
    assert_eq!(
        constraint_to_distribution(&constraints, "plan").unwrap(),
        Distribution::from(plan)
    );
}

#[test]
fn exported_rules_accept_exactly_the_support() {
    let dist = FloatDistribution::builder("x").bounds(-1.0, 1.0).build().unwrap();
    let constraints = dist.as_constraint();
    assert_eq!(constraints.feature_constraints("x").count(), 3);
    assert!(constraints.matches("x", &Value::from(-1.0)));
    assert!(constraints.matches("x", &Value::from(1)));
    assert!(!constraints.matches("x", &Value::from(1.01)));
    assert!(!constraints.matches("x", &Value::from("one")));
}
