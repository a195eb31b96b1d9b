//! Full CRUD lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `CrmService` with
//! the real `UreqTransport` over HTTP. Validates that document building,
//! transport and parsing agree with an independent JSON:API implementation.

use crm_core::{
    ApiError, CrmClient, CrmService, Donation, Event, Person, ResourceType, Sex, Survey,
    SurveyQuestion, SurveyQuestionResponse, UreqTransport,
};

fn start_mock_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn service() -> CrmService<UreqTransport> {
    CrmService::new(CrmClient::new(&start_mock_server()), UreqTransport::new())
}

#[test]
fn donation_lifecycle() {
    let crm = service();

    // Step 1: list, should be empty.
    assert!(crm.list::<Donation>().unwrap().is_empty());

    // Step 2: create with defaults injected.
    let created = crm
        .create(&Donation {
            first_name: Some("Jane".into()),
            last_name: Some("Doe".into()),
            email: Some("jane@x.com".into()),
            amount_in_cents: Some(500),
            ..Default::default()
        })
        .unwrap();
    let id = created.id.clone().unwrap();
    assert_eq!(created.amount_in_cents, Some(500));
    assert_eq!(created.is_private, Some(false));
    assert_eq!(created.send_donor_receipt, Some(false));

    // Step 3: get.
    let fetched: Donation = crm.get(&id).unwrap();
    assert_eq!(fetched, created);

    // Step 4: partial update with a falsy value.
    let updated = crm
        .update(
            &id,
            &Donation {
                amount_in_cents: Some(0),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.amount_in_cents, Some(0));
    assert_eq!(updated.first_name.as_deref(), Some("Jane"));

    // Step 5: delete, then everything is NotFound.
    crm.delete::<Donation>(&id).unwrap();
    assert!(matches!(crm.get::<Donation>(&id), Err(ApiError::NotFound)));
    assert!(matches!(crm.delete::<Donation>(&id), Err(ApiError::NotFound)));
    assert!(crm.list::<Donation>().unwrap().is_empty());
}

#[test]
fn list_keeps_server_order() {
    let crm = service();
    for (first, cents) in [("Ann", 100), ("Bo", 200)] {
        crm.create(&Donation {
            first_name: Some(first.into()),
            amount_in_cents: Some(cents),
            ..Default::default()
        })
        .unwrap();
    }
    let donations = crm.list::<Donation>().unwrap();
    let names: Vec<_> = donations.iter().map(|d| d.first_name.as_deref().unwrap()).collect();
    assert_eq!(names, vec!["Ann", "Bo"]);
    assert!(donations.iter().all(|d| d.id.is_some()));
}

#[test]
fn event_creates_its_page() {
    let crm = service();
    let event = crm
        .create(&Event {
            content: Some("Town hall".into()),
            start_at: Some("2025-06-10T19:00".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(event.start_at.as_deref(), Some("2025-06-10T19:00:00.000Z"));
    assert_eq!(event.capacity_count, Some(100));

    let pages = crm.list_pages().unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].status.as_deref(), Some("unlisted"));
    assert!(pages[0].slug.as_deref().unwrap().starts_with("event-"));
}

#[test]
fn people_update_over_put() {
    let crm = service();
    let person = crm
        .create(&Person {
            first_name: Some("Ada".into()),
            sex: Some(Sex::Female),
            ..Default::default()
        })
        .unwrap();
    let id = person.id.unwrap();
    let updated = crm
        .update(
            &id,
            &Person {
                email: Some("ada@example.org".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.email.as_deref(), Some("ada@example.org"));
    assert_eq!(updated.sex, Some(Sex::Female));
    assert_eq!(updated.is_volunteer, Some(false));
}

#[test]
fn survey_workflow() {
    let crm = service();

    let survey = crm.create_survey("Fall Canvass & More").unwrap();
    let survey_id = survey.id.clone().unwrap();
    assert!(matches!(
        crm.create_survey("Fall Canvass & More"),
        Err(ApiError::Conflict(_))
    ));

    let mut question = SurveyQuestion {
        content: Some("Favorite color?".into()),
        survey_id: Some(survey_id.clone()),
        ..Default::default()
    };
    question.set_options(&["Red", "Blue"]);
    let question = crm.create_survey_question(&question).unwrap();
    assert_eq!(question.survey_id.as_deref(), Some(survey_id.as_str()));
    assert_eq!(question.options(), vec!["Red", "Blue"]);

    let orphan = SurveyQuestion {
        survey_id: Some("424242".into()),
        ..Default::default()
    };
    assert!(matches!(crm.create_survey_question(&orphan), Err(ApiError::Validation(_))));

    let answer = crm
        .create(&SurveyQuestionResponse {
            survey_question_id: question.id.clone(),
            content: Some("Blue".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(answer.content.as_deref(), Some("Blue"));

    let surveys: Vec<Survey> = crm.list().unwrap();
    assert_eq!(surveys.len(), 1);
    assert_eq!(crm.list::<SurveyQuestionResponse>().unwrap().len(), 1);
}

#[test]
fn flat_records_carry_every_attribute() {
    let crm = service();
    crm.create(&Survey::named("Flat")).unwrap();

    let client = crm.client();
    let response = crm_core::Transport::execute(&UreqTransport::new(), client.build_list(ResourceType::Surveys)).unwrap();
    let records = client.parse_list_flat(response).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["name"], "Flat");
    assert!(records[0].contains_key("id"));
}
