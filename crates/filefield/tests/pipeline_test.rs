mod helpers;

use async_trait::async_trait;
use filefield::{
    FieldOutcome, Pipeline, Record, RecordState, UploadField, ValidatableField, Validation,
};
use helpers::Fixture;
use std::collections::HashMap;
use std::sync::Arc;

/// Plain text column that must not be blank
struct RequiredText {
    column: &'static str,
}

#[async_trait]
impl ValidatableField for RequiredText {
    fn column(&self) -> &str {
        self.column
    }

    async fn validate(&self, validation: &mut Validation, _record: &dyn Record) -> FieldOutcome {
        let value = validation
            .get(self.column)
            .and_then(|input| input.as_text())
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        if value.is_empty() {
            validation.error(self.column, "not_empty");
            return FieldOutcome::Rejected("not_empty");
        }
        FieldOutcome::Staged(value)
    }
}

fn pipeline(fixture: &Fixture) -> Pipeline {
    // Upload declared first on purpose: it must still run after the rules
    Pipeline::new()
        .with_field(Arc::new(UploadField::new("photo", fixture.config())))
        .with_field(Arc::new(RequiredText { column: "title" }))
}

#[tokio::test]
async fn test_rule_failure_blocks_upload() {
    let fixture = Fixture::new();
    let old = fixture.existing("old.png");
    let pipeline = pipeline(&fixture);
    let record = RecordState::loaded([("photo", "old.png"), ("title", "Old")]);

    let mut validation = Validation::new()
        .with_input("title", "   ")
        .with_input("photo", fixture.payload("New.png", "image/png", b"png"));

    let submission = pipeline.validate(&mut validation, &record).await;

    assert_eq!(
        submission.outcome("title"),
        Some(&FieldOutcome::Rejected("not_empty"))
    );
    assert_eq!(submission.outcome("photo"), Some(&FieldOutcome::Skipped));
    assert_eq!(validation.errors().len(), 1);
    assert!(old.exists());
    assert_eq!(fixture.upload_count(), 1);
}

#[tokio::test]
async fn test_validate_then_save() {
    let fixture = Fixture::new();
    let old = fixture.existing("old.png");
    let pipeline = pipeline(&fixture);
    let record = RecordState::loaded([("photo", "old.png"), ("title", "Old")]);

    let mut validation = Validation::new()
        .with_input("title", "New title")
        .with_input("photo", fixture.payload("Holiday Pic.PNG", "image/png", b"png"));

    let submission = pipeline.validate(&mut validation, &record).await;
    assert!(!validation.has_errors());

    let mut values = HashMap::from([
        ("photo".to_string(), "old.png".to_string()),
        ("title".to_string(), "Old".to_string()),
    ]);
    pipeline.save(&submission, &mut values, &record);

    assert_eq!(values["photo"], "holiday-pic.png");
    assert_eq!(values["title"], "New title");
    assert!(!old.exists());
}

#[tokio::test]
async fn test_submissions_are_independent() {
    let fixture = Fixture::new();
    let pipeline = pipeline(&fixture);
    let record = RecordState::loaded([("photo", "keep.png")]);

    let mut with_file = Validation::new()
        .with_input("title", "One")
        .with_input("photo", fixture.payload("one.png", "image/png", b"1"));
    let first = pipeline.validate(&mut with_file, &record).await;
    assert_eq!(first.staged("photo"), Some("one.png"));

    // A later submission without a file must not pick up the earlier filename
    let mut without_file = Validation::new().with_input("title", "Two");
    let second = pipeline.validate(&mut without_file, &record).await;

    let mut values = HashMap::from([("photo".to_string(), "keep.png".to_string())]);
    pipeline.save(&second, &mut values, &record);
    assert_eq!(values["photo"], "keep.png");
}

#[tokio::test]
async fn test_error_messages() {
    let fixture = Fixture::new();
    let config = filefield::FieldConfig::builder(fixture.uploads.path().to_string_lossy())
        .allow_type("image/*")
        .build()
        .unwrap();
    let pipeline = Pipeline::new().with_field(Arc::new(UploadField::new("photo", config)));

    let mut validation = Validation::new()
        .with_input("photo", fixture.payload("clip.mp4", "video/mp4", b"mp4"));
    pipeline.validate(&mut validation, &RecordState::new()).await;

    let messages = validation.errors().messages();
    assert_eq!(
        messages,
        vec![(
            "photo".to_string(),
            "photo must be one of the allowed file types".to_string()
        )]
    );
}
