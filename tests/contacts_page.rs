mod common;

use serde_json::{Value, json};

use ccc_console::domain::call::{CallDirection, CallState};
use ccc_console::domain::campaign::Campaign;
use ccc_console::domain::contact::{Contact, ContactGroup};
use ccc_console::domain::entity::Entity;
use ccc_console::domain::message::{MessageKind, PersonalizedMessage};
use ccc_console::domain::number::EngagedNumber;
use ccc_console::domain::types::{ContactId, NumberId};
use ccc_console::services::autodialer::COMPLETE_MESSAGE;
use ccc_console::services::call::CallEvent;
use ccc_console::services::contacts_page::ContactsPage;
use common::{FakeApi, PhoneLine, Softphone, TestUi, UiEvent, contacts};

fn api(contact_count: i64) -> FakeApi {
    api_with_contacts(contacts(contact_count))
}

fn api_with_contacts(rows: Vec<Value>) -> FakeApi {
    FakeApi::new(4)
        .with_collection(Contact::ENDPOINT, rows)
        .with_collection(
            Campaign::ENDPOINT,
            vec![json!({"id": 1, "name": "Spring", "use_voice": true})],
        )
        .with_collection(ContactGroup::ENDPOINT, vec![json!({"id": 2, "name": "VIP"})])
        .with_collection(
            EngagedNumber::ENDPOINT,
            vec![json!({"id": 7, "twilio_number": "+16502530000", "engaged_by": "campaign"})],
        )
        .with_collection(
            PersonalizedMessage::ENDPOINT,
            vec![
                json!({"id": 11, "type": "sms", "is_default": true}),
                json!({"id": 12, "type": "voice", "is_default": false}),
            ],
        )
}

fn mounted(api: &FakeApi, ui: &TestUi) -> ContactsPage<PhoneLine> {
    let mut page = ContactsPage::new(31205, 2);
    page.mount(api, ui).unwrap();
    page
}

/// Hangs up the current call and waits out the dialer countdown.
fn finish_call(
    page: &mut ContactsPage<PhoneLine>,
    api: &FakeApi,
    phone: &mut Softphone,
    ui: &TestUi,
) {
    page.on_call_event(CallEvent::Connect, ui);
    page.tick(api, phone, ui).unwrap();
    page.on_call_event(CallEvent::Disconnect, ui);
    for _ in 0..2 {
        page.tick(api, phone, ui).unwrap();
    }
}

#[test]
fn mount_loads_lookups_and_first_page() {
    let api = api(6);
    let ui = TestUi::default();

    let page = mounted(&api, &ui);

    assert_eq!(page.campaigns().len(), 1);
    assert_eq!(page.groups()[0].name, "VIP");
    assert_eq!(page.numbers()[0].twilio_number, "+16502530000");
    assert_eq!(page.contacts().count(), 6);
    assert_eq!(page.contacts().results().len(), 4);
    assert_eq!(
        page.messages()
            .default_of(MessageKind::Sms)
            .map(|m| m.id.get()),
        Some(11)
    );
    assert!(api
        .requests()
        .contains(&"GET /api/marketing/engaged-phone-numbers/?engaged_by=campaign".to_string()));
    assert!(ui.messages().is_empty());
}

#[test]
fn autodialer_walks_every_page_and_completes() {
    let api = api(6);
    let ui = TestUi::default();
    let mut phone = Softphone::default();
    let mut page = mounted(&api, &ui);
    page.select_number(NumberId::new(7).unwrap()).unwrap();

    page.start_autodial(&api, &mut phone, &ui).unwrap();
    for _ in 0..10 {
        if !page.dialer().is_in_progress() {
            break;
        }
        finish_call(&mut page, &api, &mut phone, &ui);
    }

    // Contacts 3 and 6 have no phone and are skipped.
    assert_eq!(
        phone.dialed_numbers(),
        vec!["+12125550001", "+12125550002", "+12125550004", "+12125550005"]
    );
    assert!(phone.dialed.iter().all(|p| p.from == "+16502530000"));
    assert_eq!(page.contacts().page(), 1);
    assert_eq!(
        ui.alerts(),
        vec![
            "Contact3 has no phone number attached".to_string(),
            "Contact6 has no phone number attached".to_string(),
            COMPLETE_MESSAGE.to_string(),
        ]
    );
    assert_eq!(page.call().state(), CallState::Idle);
}

#[test]
fn paused_dialer_waits_for_resume() {
    let api = api(2);
    let ui = TestUi::default();
    let mut phone = Softphone::default();
    let mut page = mounted(&api, &ui);
    page.select_number(NumberId::new(7).unwrap()).unwrap();

    page.start_autodial(&api, &mut phone, &ui).unwrap();
    page.pause_autodial();
    finish_call(&mut page, &api, &mut phone, &ui);
    assert_eq!(phone.dialed.len(), 1);

    page.resume_autodial(&api, &mut phone, &ui).unwrap();
    assert_eq!(phone.dialed_numbers(), vec!["+12125550001", "+12125550002"]);
}

#[test]
fn incoming_call_during_autodial_is_rejected() {
    let api = api(2);
    let ui = TestUi::default();
    let mut phone = Softphone::default();
    let mut page = mounted(&api, &ui);
    page.select_number(NumberId::new(7).unwrap()).unwrap();
    page.start_autodial(&api, &mut phone, &ui).unwrap();
    let intruder = PhoneLine::default();

    page.on_call_event(
        CallEvent::Incoming {
            from: "+13105550000".into(),
            connection: intruder.clone(),
        },
        &ui,
    );

    assert_eq!(intruder.actions.borrow().clone(), vec!["reject"]);
    assert_eq!(
        ui.events.borrow().first(),
        Some(&UiEvent::ShowModal("+12125550001".into(), CallDirection::Outgoing))
    );
}

#[test]
fn expired_token_reloads_page() {
    let api = api(1);
    let ui = TestUi::default();
    let mut phone = Softphone::default();
    let mut page = mounted(&api, &ui);
    page.select_number(NumberId::new(7).unwrap()).unwrap();
    page.set_number_to_call("+13105550000");
    page.call_number(&mut phone, &ui).unwrap();

    page.on_call_event(
        CallEvent::Error {
            code: 31205,
            message: "JWT token expired".into(),
        },
        &ui,
    );

    assert_eq!(ui.events.borrow().last(), Some(&UiEvent::Reload));
    assert!(page.call().state().is_idle());
}

#[test]
fn default_sms_is_sent_from_selected_number() {
    let api = api(3);
    let ui = TestUi::default();
    let mut page = mounted(&api, &ui);

    let contact = ContactId::new(2).unwrap();
    assert!(!page.send_default(&api, &ui, MessageKind::Sms, contact).unwrap());
    assert_eq!(ui.alerts(), vec!["Please select a number for this action".to_string()]);

    page.select_number(NumberId::new(7).unwrap()).unwrap();
    assert!(page.send_default(&api, &ui, MessageKind::Sms, contact).unwrap());

    assert_eq!(
        api.requests().last().map(String::as_str),
        Some("POST /api/marketing/autodialer/personalized-messages/11/send/")
    );
    assert!(!page.messages().is_sending(MessageKind::Sms, contact));
    assert_eq!(ui.messages(), vec!["SMS has been sent successfully!".to_string()]);
}

#[test]
fn broadcast_targets_filtered_selection() {
    let api = api(6);
    let ui = TestUi::default();
    let mut page = mounted(&api, &ui);
    page.select_number(NumberId::new(7).unwrap()).unwrap();
    page.contacts_mut().filters_mut().set("group", "1");

    page.toggle_select_all(&api, &ui).unwrap();
    assert_eq!(
        page.messages()
            .selected_contacts()
            .iter()
            .map(|c| c.get())
            .collect::<Vec<_>>(),
        vec![1, 3, 5]
    );

    assert!(!page.broadcast(&api, &ui, MessageKind::Voice).unwrap());
    assert!(ui.alerts()[0].starts_with("Please set a default Voice Message"));

    assert!(page.broadcast(&api, &ui, MessageKind::Sms).unwrap());
}

#[test]
fn unmount_stops_dialer_and_releases_phone() {
    let api = api(3);
    let ui = TestUi::default();
    let mut phone = Softphone::default();
    let mut page = mounted(&api, &ui);
    page.select_number(NumberId::new(7).unwrap()).unwrap();
    page.start_autodial(&api, &mut phone, &ui).unwrap();

    page.unmount(&mut phone, &ui);
    for _ in 0..5 {
        page.tick(&api, &mut phone, &ui).unwrap();
    }

    assert!(phone.released);
    assert!(!page.dialer().is_in_progress());
    assert_eq!(phone.dialed.len(), 1);
    assert!(page.call().state().is_idle());
}

#[test]
fn contact_with_unparseable_phone_is_skipped() {
    let api = api_with_contacts(vec![
        json!({"id": 1, "first_name": "Ann", "phone": "2125550101"}),
        json!({"id": 2, "first_name": "Bob", "phone": "+12125550102"}),
    ]);
    let ui = TestUi::default();
    let mut phone = Softphone::default();
    let mut page = mounted(&api, &ui);
    page.select_number(NumberId::new(7).unwrap()).unwrap();

    page.start_autodial(&api, &mut phone, &ui).unwrap();

    assert_eq!(phone.dialed_numbers(), vec!["+12125550102"]);
    assert!(page.dialer().is_in_progress());
    assert_eq!(ui.alerts(), vec!["Ann has an invalid phone number".to_string()]);
}
