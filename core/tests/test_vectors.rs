//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use patient_core::{
    ApiError, HttpMethod, HttpRequest, HttpResponse, Medication, MedicationForm, Patient,
    PatientClient, PatientPage, Temperature, TemperatureForm, TemperatureOutcome,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> PatientClient {
    PatientClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

    match expected.get("body") {
        Some(body) => {
            let expected_headers: Vec<(String, String)> = expected["headers"]
                .as_array()
                .unwrap()
                .iter()
                .map(|h| {
                    let arr = h.as_array().unwrap();
                    (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
                })
                .collect();
            assert_eq!(req.headers, expected_headers, "{name}: headers");

            let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn check_error(name: &str, case: &Value, err: ApiError) {
    match case["expected_error"].as_str().unwrap() {
        "NotFound" => assert!(matches!(err, ApiError::NotFound), "{name}: expected NotFound"),
        "BadRequest" => match err {
            ApiError::BadRequest(message) => {
                if let Some(expected) = case.get("expected_message") {
                    assert_eq!(message, expected.as_str().unwrap(), "{name}: message");
                }
            }
            other => panic!("{name}: expected BadRequest, got {other:?}"),
        },
        "HttpError" => assert!(matches!(err, ApiError::HttpError { .. }), "{name}: expected HttpError"),
        other => panic!("{name}: unknown expected_error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Count
// ---------------------------------------------------------------------------

#[test]
fn count_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/count.json")) {
        let name = case["name"].as_str().unwrap();
        check_request(name, &c.build_count(), &case["expected_request"]);

        let result = c.parse_count(simulated(&case));
        if case.get("expected_error").is_some() {
            check_error(name, &case, result.unwrap_err());
        } else {
            assert_eq!(result.unwrap(), case["expected_result"].as_u64().unwrap(), "{name}: count");
        }
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[test]
fn get_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/get.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64().unwrap();
        check_request(name, &c.build_get_patient(id), &case["expected_request"]);

        let result = c.parse_get_patient(simulated(&case));
        if case.get("expected_error").is_some() {
            check_error(name, &case, result.unwrap_err());
        } else {
            let expected: Patient = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/list.json")) {
        let name = case["name"].as_str().unwrap();
        let page = case["input_page"].as_u64().unwrap();
        let size = case["input_size"].as_u64().unwrap();
        check_request(name, &c.build_list_patients(page, size), &case["expected_request"]);

        let parsed = c.parse_list_patients(simulated(&case)).unwrap();
        let expected: PatientPage = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(parsed, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Medication upsert
// ---------------------------------------------------------------------------

#[test]
fn medication_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/medication.json")) {
        let name = case["name"].as_str().unwrap();
        let input: MedicationForm = serde_json::from_value(case["input"].clone()).unwrap();
        let req = c.build_upsert_medication(&input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_upsert_medication(simulated(&case));
        if case.get("expected_error").is_some() {
            check_error(name, &case, result.unwrap_err());
            continue;
        }
        let outcome = result.unwrap();
        let expected = &case["expected_result"];
        assert_eq!(outcome.created, expected["created"].as_bool().unwrap(), "{name}: created");
        assert_eq!(outcome.message, expected["message"].as_str().unwrap(), "{name}: message");
        let medications: Vec<Medication> =
            serde_json::from_value(expected["medications"].clone()).unwrap();
        assert_eq!(outcome.medications, medications, "{name}: medications");
    }
}

// ---------------------------------------------------------------------------
// Temperature upsert
// ---------------------------------------------------------------------------

#[test]
fn temperature_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/temperature.json")) {
        let name = case["name"].as_str().unwrap();
        let input: TemperatureForm = serde_json::from_value(case["input"].clone()).unwrap();
        let req = c.build_upsert_temperature(&input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_upsert_temperature(simulated(&case));
        if case.get("expected_error").is_some() {
            check_error(name, &case, result.unwrap_err());
            continue;
        }
        let expected = &case["expected_result"];
        match (result.unwrap(), expected["kind"].as_str().unwrap()) {
            (TemperatureOutcome::Updated(reading), "Updated") => {
                let want: Temperature = serde_json::from_value(expected["reading"].clone()).unwrap();
                assert_eq!(reading, want, "{name}: reading");
            }
            (TemperatureOutcome::Recorded { message, patient }, "Recorded") => {
                assert_eq!(message, expected["message"].as_str().unwrap(), "{name}: message");
                let want: Vec<Temperature> =
                    serde_json::from_value(expected["body_temperatures"].clone()).unwrap();
                assert_eq!(patient.body_temperatures, want, "{name}: readings");
            }
            (outcome, kind) => panic!("{name}: expected {kind}, got {outcome:?}"),
        }
    }
}
