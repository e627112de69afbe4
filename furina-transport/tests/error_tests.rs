use furina_transport::TransportError;

#[test]
fn fetch_error_display() {
    let err = TransportError::Fetch { status: 404 };
    assert_eq!(err.to_string(), "fetching messages failed with status 404");
}

#[test]
fn dispatch_error_display() {
    let err = TransportError::Dispatch {
        status: 422,
        body: "bad event".into(),
    };
    assert_eq!(err.to_string(), "dispatch rejected with status 422: bad event");
}

#[test]
fn config_error_display() {
    let err = TransportError::Config("missing repo".into());
    assert_eq!(err.to_string(), "invalid configuration: missing repo");
}

#[test]
fn from_serde_json_error() {
    let json_err = serde_json::from_str::<serde_json::Value>("not valid json").unwrap_err();
    let err: TransportError = json_err.into();
    assert!(err.to_string().contains("serialization error"));
}
