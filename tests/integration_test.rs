//! Integration tests for the foundation API crate

use amani_api::core::amortization::{self, round_to_cents};
use amani_api::core::impact::{self, ImpactCostTable};
use amani_api::models::content::{
    Card, ContactContent, ContactUpdate, DonateContent, DonateUpdate, FaqEntry, Hero, HomeContent,
    HomeUpdate, Section,
};
use amani_api::models::errors::ErrorCode;
use amani_api::models::forms::{ContactMessage, FormPayload, LoanApplication, StoredSubmission};
use amani_api::store::{list_documents, ContentStore};
use amani_api::telemetry::{EventKind, TelemetryCollector, TelemetryEvent};
use std::path::PathBuf;

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("amani-it-{}-{}", tag, uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn hero() -> Hero {
    Hero {
        title: "Lasting change".to_string(),
        subtitle: "Education, healthcare and microloans".to_string(),
        image: None,
        cta_label: Some("Donate".to_string()),
        cta_link: Some("/donate".to_string()),
    }
}

#[test]
fn test_quote_invariant_holds_across_inputs() {
    for (principal, term, rate) in [
        (1000.0, 12, 4.68),
        (5000.0, 36, 4.68),
        (120_000.0, 240, 7.25),
        (800.0, 4, 0.5),
    ] {
        let quote = amortization::quote(principal, term, rate).unwrap();
        assert!(
            (quote.monthly_payment * term as f64 - quote.total_repayment).abs() < 1e-6,
            "monthly * term must equal total for principal={}",
            principal
        );
        assert!(quote.monthly_payment > 0.0);
    }
}

#[test]
fn test_quote_program_rate_figures() {
    let quote = amortization::quote(1000.0, 12, 4.68).unwrap();
    assert!((round_to_cents(quote.monthly_payment) - 85.46).abs() < 0.02);
    assert!((quote.total_repayment - 1025.53).abs() < 0.1);
}

#[test]
fn test_zero_rate_quote_is_straight_line() {
    let quote = amortization::quote(1200.0, 12, 0.0).unwrap();
    assert_eq!(quote.monthly_payment, 100.0);
    assert_eq!(quote.total_repayment, 1200.0);
}

#[test]
fn test_impact_examples() {
    let costs = ImpactCostTable {
        student: 25.0,
        microloan: 150.0,
        healthcare: 40.0,
        community: 500.0,
    };

    let fifty = impact::estimate(50.0, &costs).unwrap();
    assert_eq!(fifty.students, 2);

    let ten = impact::estimate(10.0, &costs).unwrap();
    assert_eq!(ten.students, 0);
    assert!(ten.is_empty());
}

#[test]
fn test_impact_floor_semantics() {
    let costs = ImpactCostTable::default();
    for amount in [0.0, 0.01, 24.99, 25.0, 1_000_000.0] {
        let estimate = impact::estimate(amount, &costs).unwrap();
        assert_eq!(estimate.students, (amount / costs.student).floor() as u64);
        assert_eq!(estimate.microloans, (amount / costs.microloan).floor() as u64);
        assert_eq!(
            estimate.healthcare_visits,
            (amount / costs.healthcare).floor() as u64
        );
    }
}

#[test]
fn test_content_store_end_to_end_edit_cycle() {
    let dir = temp_dir("edit-cycle");
    let store = ContentStore::new(&dir, 60).unwrap();

    store
        .persist(&HomeContent {
            hero: hero(),
            sections: vec![Section {
                heading: "Programs".to_string(),
                body: "Where donations go.".to_string(),
                cards: vec![Card {
                    title: "Education".to_string(),
                    body: "School fees.".to_string(),
                    icon: None,
                }],
            }],
            impact_banner: None,
        })
        .unwrap();

    // The edit a CMS form would send, as tagged JSON
    let update: HomeUpdate = serde_json::from_value(serde_json::json!({
        "op": "push_card",
        "section": 0,
        "value": {"title": "Healthcare", "body": "Clinic visits."}
    }))
    .unwrap();
    store.update::<HomeContent>(update).unwrap();

    let loaded: HomeContent = store.load().unwrap();
    assert_eq!(loaded.sections[0].cards.len(), 2);
    assert_eq!(loaded.sections[0].cards[1].title, "Healthcare");

    assert_eq!(list_documents(&dir), vec!["home".to_string()]);
}

#[test]
fn test_rejected_edit_is_atomic() {
    let dir = temp_dir("atomic");
    let store = ContentStore::new(&dir, 60).unwrap();

    store
        .persist(&DonateContent {
            hero: hero(),
            suggested_amounts: vec![10.0, 25.0, 50.0],
            faq: vec![FaqEntry {
                question: "Is my donation tax deductible?".to_string(),
                answer: "Yes, receipts are issued automatically.".to_string(),
            }],
        })
        .unwrap();

    let err = store
        .update::<DonateContent>(DonateUpdate::RemoveFaqEntry { entry: 7 })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ContentUpdateRejected);

    let loaded: DonateContent = store.load().unwrap();
    assert_eq!(loaded.faq.len(), 1);
    assert_eq!(loaded.suggested_amounts, vec![10.0, 25.0, 50.0]);
}

#[test]
fn test_contact_update_validation() {
    let dir = temp_dir("contact");
    let store = ContentStore::new(&dir, 60).unwrap();

    store
        .persist(&ContactContent {
            hero: hero(),
            email: "hello@amani.org".to_string(),
            phone: "+254 700 000000".to_string(),
            address: "Nairobi, Kenya".to_string(),
            office_hours: "Mon-Fri 9:00-17:00 EAT".to_string(),
        })
        .unwrap();

    let err = store
        .update::<ContactContent>(ContactUpdate::SetEmail {
            email: "broken".to_string(),
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ContentUpdateRejected);

    store
        .update::<ContactContent>(ContactUpdate::SetEmail {
            email: "info@amani.org".to_string(),
        })
        .unwrap();
    let loaded: ContactContent = store.load().unwrap();
    assert_eq!(loaded.email, "info@amani.org");
}

#[test]
fn test_form_validation_and_storage_shape() {
    let valid = ContactMessage {
        name: "Asha Mwangi".to_string(),
        email: "asha@example.com".to_string(),
        subject: "Partnership".to_string(),
        message: "Hello".to_string(),
    };
    assert!(valid.validate().is_ok());

    let stored = StoredSubmission::new(valid);
    let line = serde_json::to_string(&stored).unwrap();
    assert!(line.contains("\"form\":\"contact\""));

    let bad_loan = LoanApplication {
        name: "Juma".to_string(),
        email: "juma@example.com".to_string(),
        amount: -5.0,
        term_months: 12,
        purpose: "Stock".to_string(),
    };
    assert_eq!(
        bad_loan.validate().unwrap_err().code,
        ErrorCode::FormInvalidField
    );
}

#[test]
fn test_telemetry_tracks_donation_totals() {
    let telemetry = TelemetryCollector::with_config(temp_dir("telemetry"), 100);

    telemetry.record(TelemetryEvent::new(
        EventKind::DonationVerified,
        120.0,
        8,
        "AMN-test".to_string(),
    ));
    telemetry.record_kind(EventKind::LoanQuote, 2, "term 12 months");

    let stats = telemetry.get_stats();
    assert_eq!(stats.donations_verified, 1);
    assert_eq!(stats.quotes_served, 1);
    assert!((stats.total_raised - 120.0).abs() < f64::EPSILON);
    assert_eq!(stats.events_by_kind.get("donation_verified"), Some(&1));
}
