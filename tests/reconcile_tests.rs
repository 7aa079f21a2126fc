mod common;

use std::sync::Arc;
use tripsheet::core::reconcile::{HmCorrectionInput, HmReconciliationEngine, ShiftChangeInput};
use tripsheet::models::correction::CorrectionKind;
use tripsheet::models::shift::ShiftValue;
use tripsheet::store::fake::FakeStore;
use tripsheet::utils::time::to_store_string;

fn input() -> HmCorrectionInput {
    HmCorrectionInput {
        target_id: "1201".to_string(),
        operator_id: "88123".to_string(),
        current_hm: Some(10450.5),
        new_hm: "10451.0".to_string(),
        opr_shift: "1".to_string(),
    }
}

#[test]
fn each_kind_writes_its_remark_tag() {
    let cases = [
        (CorrectionKind::HmUpdate, "hm_update"),
        (CorrectionKind::Valid, "valid"),
        (CorrectionKind::NextHmUpdate, "next_hm_update"),
        (CorrectionKind::PrevHmUpdate, "prev_hm_update"),
    ];

    for (kind, remark) in cases {
        let store = Arc::new(FakeStore::new());
        let engine = HmReconciliationEngine::new(store.clone());
        engine.apply_correction(kind, &input(), "dsp01").unwrap();

        let corrections = store.corrections.lock().unwrap();
        assert_eq!(corrections[0].remark, remark);
        assert_eq!(corrections[0].actor, "dsp01");
    }
}

#[test]
fn operator_and_shift_are_carried_through_unchanged() {
    let store = Arc::new(FakeStore::new());
    let engine = HmReconciliationEngine::new(store.clone());
    engine
        .apply_correction(CorrectionKind::HmUpdate, &input(), "dsp01")
        .unwrap();

    let corrections = store.corrections.lock().unwrap();
    let c = &corrections[0];
    assert_eq!(c.before_nrp, c.after_nrp);
    assert_eq!(c.before_shift, c.after_shift);
    assert_eq!(c.before_hm, Some(10450.5));
    assert_eq!(c.after_hm, 10451.0);
}

#[test]
fn unparsable_hm_is_rejected_before_any_rpc() {
    let store = Arc::new(FakeStore::new());
    let engine = HmReconciliationEngine::new(store.clone());

    let mut bad = input();
    bad.new_hm = "abc".to_string();
    let err = engine
        .apply_correction(CorrectionKind::HmUpdate, &bad, "dsp01")
        .unwrap_err();

    assert!(err.is_validation());
    assert!(store.call_log().is_empty());
}

#[test]
fn missing_target_or_operator_is_rejected() {
    let store = Arc::new(FakeStore::new());
    let engine = HmReconciliationEngine::new(store.clone());

    let mut no_id = input();
    no_id.target_id = "".to_string();
    assert!(
        engine
            .apply_correction(CorrectionKind::NextHmUpdate, &no_id, "dsp01")
            .unwrap_err()
            .is_validation()
    );

    let mut no_op = input();
    no_op.operator_id = " ".to_string();
    assert!(
        engine
            .apply_correction(CorrectionKind::PrevHmUpdate, &no_op, "dsp01")
            .unwrap_err()
            .is_validation()
    );
    assert!(store.call_log().is_empty());
}

fn shift_change() -> ShiftChangeInput {
    ShiftChangeInput {
        id: "1201".to_string(),
        next_id: "1202".to_string(),
        report_time: "2024-03-02T06:10:00".to_string(),
        next_report_time: "2024-03-02T18:40:00".to_string(),
        equipment_no: "DT1101".to_string(),
        operator_id: "88123".to_string(),
        hm: Some(10450.5),
        next_hm: Some(10461.0),
        opr_shift: "1".to_string(),
        new_shift: "2".to_string(),
    }
}

#[test]
fn shift_update_submits_the_pair_in_one_call() {
    let store = Arc::new(FakeStore::new());
    let engine = HmReconciliationEngine::new(store.clone());

    engine.update_shift(&shift_change()).unwrap();

    assert_eq!(store.call_log(), vec!["update_shift"]);
    let changes = store.shift_changes.lock().unwrap();
    let change = &changes[0];
    assert_eq!(change.id, "1201");
    assert_eq!(change.next_id.as_deref(), Some("1202"));
    assert_eq!(change.new_shift, ShiftValue::Two);
    assert_eq!(
        to_store_string(&change.report_time.unwrap()),
        "2024-03-02 06:10:00"
    );
}

#[test]
fn shift_update_rejects_values_outside_the_roster_domain() {
    let store = Arc::new(FakeStore::new());
    let engine = HmReconciliationEngine::new(store.clone());

    for bad in ["4", "S01", ""] {
        let mut change = shift_change();
        change.new_shift = bad.to_string();
        assert!(engine.update_shift(&change).unwrap_err().is_validation());
    }
    assert!(store.call_log().is_empty());
}

#[test]
fn shift_update_timestamps_parse_leniently() {
    let store = Arc::new(FakeStore::new());
    let engine = HmReconciliationEngine::new(store.clone());

    let mut change = shift_change();
    change.report_time = "not a timestamp".to_string();
    change.next_report_time = "".to_string();
    engine.update_shift(&change).unwrap();

    let changes = store.shift_changes.lock().unwrap();
    assert_eq!(changes[0].report_time, None);
    assert_eq!(changes[0].next_report_time, None);
}

#[test]
fn historical_lookup_requires_an_equipment_number() {
    let store = Arc::new(FakeStore::new());
    let engine = HmReconciliationEngine::new(store.clone());

    assert!(engine.historical_logins(" ").unwrap_err().is_validation());
    assert!(engine.historical_logins("DT1101").unwrap().is_empty());
}
