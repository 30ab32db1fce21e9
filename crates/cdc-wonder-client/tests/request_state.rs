//! Wire-level state of the request builder across chained configuration

use cdc_wonder_client::{Transport, WonderRequest};
use cdc_wonder_diagnostics::{Result, WonderError};
use cdc_wonder_types::{Ages, Dates, Gender, Grouping, Icd10Code, Weekday, Year};
use std::cell::RefCell;

/// Transport stub that records the posted document and replies with a
/// canned body.
struct StubTransport {
    reply: &'static str,
    posted: RefCell<Option<String>>,
}

impl StubTransport {
    fn new(reply: &'static str) -> Self {
        Self {
            reply,
            posted: RefCell::new(None),
        }
    }

    fn posted(&self) -> String {
        self.posted.borrow().clone().expect("nothing posted")
    }
}

impl Transport for StubTransport {
    fn post(&self, request_xml: &str) -> Result<String> {
        self.posted.borrow_mut().replace(request_xml.to_string());
        Ok(self.reply.to_string())
    }
}

/// Transport stub that fails the way the endpoint does
struct RejectingTransport;

impl Transport for RejectingTransport {
    fn post(&self, _request_xml: &str) -> Result<String> {
        Err(WonderError::server(
            500,
            vec![
                "The dates parameter value is not valid.".to_string(),
                "No results were returned.".to_string(),
            ],
        ))
    }
}

#[test]
fn default_document_matches_the_web_form() {
    let xml = WonderRequest::new().to_request_xml();

    assert!(xml.starts_with("<request-parameters>"));
    assert!(xml.ends_with("</request-parameters>"));
    assert!(xml.contains("<name>accept_datause_restrictions</name>\n<value>true</value>"));
    assert!(xml.contains("<name>B_1</name>\n<value>D76.V1-level1</value>"));
    assert!(xml.contains("<name>B_2</name>\n<value>*None*</value>"));
    assert!(xml.contains("<name>M_3</name>\n<value>D76.M3</value>"));
    assert!(xml.contains("<name>O_show_zeros</name>\n<value>true</value>"));
    assert!(xml.contains("<name>O_show_totals</name>\n<value>false</value>"));
    assert!(xml.contains("<name>stage</name>\n<value>request</value>"));
}

#[test]
fn chained_query_reaches_the_wire() {
    let mut request = WonderRequest::new();
    request
        .ages(&[Ages::range(15, 44).unwrap()])
        .unwrap()
        .group_by(&[Grouping::TenYearAgeGroups, Grouping::Gender])
        .unwrap()
        .gender(&[Gender::Male, Gender::Female])
        .unwrap()
        .weekday(&[Weekday::Saturday, Weekday::Sunday])
        .unwrap()
        .dates(&[Dates::single(Year::new(2010))])
        .unwrap()
        .cause_of_death([Icd10Code::new("K00-K92").unwrap()])
        .unwrap();

    let transport = StubTransport::new("<page/>");
    let response = request.send_with(&transport).unwrap();
    let posted = transport.posted();

    assert!(posted.contains("<name>B_1</name>\n<value>D76.V5</value>"));
    assert!(posted.contains("<name>B_2</name>\n<value>D76.V7</value>"));
    assert!(posted.contains("<name>O_age</name>\n<value>D76.V5</value>"));
    assert!(posted.contains(
        "<name>V_D76.V5</name>\n<value>15-24</value>\n<value>25-34</value>\n<value>35-44</value>"
    ));
    assert!(posted.contains("<name>V_D76.V7</name>\n<value>M</value>\n<value>F</value>"));
    assert!(posted.contains("<name>V_D76.V24</name>\n<value>7</value>\n<value>1</value>"));
    assert!(posted.contains("<name>F_D76.V1</name>\n<value>2010</value>"));
    assert!(posted.contains("<name>F_D76.V2</name>\n<value>K00-K92</value>"));

    assert_eq!(response.as_xml(), "<page/>");
}

#[test]
fn response_carries_grouping_labels() {
    let mut request = WonderRequest::new();
    request
        .group_by(&[Grouping::Gender, Grouping::Year])
        .unwrap();

    let transport = StubTransport::new("<page/>");
    let response = request.send_with(&transport).unwrap();

    // An empty reply decodes to an empty table under the configured labels.
    let table = response.to_table().unwrap();
    assert_eq!(
        table.headers(),
        ["Gender", "Year", "Deaths", "Population", "Crude Rate Per 100,000"]
    );
    assert!(table.rows().is_empty());
}

#[test]
fn server_rejection_surfaces_every_message() {
    let request = WonderRequest::new();
    let err = request.send_with(&RejectingTransport).unwrap_err();

    match err {
        WonderError::Server { status, messages } => {
            assert_eq!(status, 500);
            assert_eq!(messages.len(), 2);
            assert!(messages[0].contains("dates parameter"));
        }
        other => panic!("expected server error, got {other:?}"),
    }
}
