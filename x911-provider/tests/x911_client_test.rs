//! X911Client 集成测试（使用 RecordingExecutor，无需网络）
//!
//! 运行方式:
//! ```bash
//! cargo test -p x911-provider --test x911_client_test
//! ```

mod common;

use std::sync::Arc;

use common::{
    RecordingExecutor, TEST_DID, expected_keys, production_client, sorted_keys, test_address,
};
use serde_json::json;
use x911_provider::{
    Action, Environment, LocationStatus, ResponseKind, ValidationStatus, X911Client, X911Error,
};

// ============ 动作与参数 ============

#[tokio::test]
async fn test_get_locations_example() {
    let (client, executor) = production_client();

    let outcome = require_ok!(client.get_locations(TEST_DID).await);
    assert_eq!(outcome.action(), Action::GetLocations);
    assert_eq!(outcome.arguments().len(), 1);
    assert_eq!(outcome.arguments()["did"], TEST_DID);

    let calls = executor.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].action, Action::GetLocations);
    assert_eq!(calls[0].response_kind, ResponseKind::X911);
    assert_eq!(&calls[0].arguments, outcome.arguments());
}

#[tokio::test]
async fn test_every_operation_sends_exact_arguments() {
    let (client, executor) = production_client();
    let address = test_address();

    let outcomes = vec![
        client.audit_911().await,
        client.get_locations(TEST_DID).await,
        client.query_911(TEST_DID).await,
        client.validate_911(&address).await,
        client.get_provisioning_history(TEST_DID).await,
        client.query_911_alert(TEST_DID).await,
        client.add_911_alert(TEST_DID, "noc@example.com").await,
        client.provision_location(TEST_DID, "L-100").await,
        client.add_location(TEST_DID, &address).await,
        client.remove_location("L-100", TEST_DID).await,
        client.update_911(TEST_DID, &address).await,
        client.insert_911(TEST_DID, &address).await,
        client.remove_911(TEST_DID).await,
    ];

    let expected_actions = [
        Action::Audit911,
        Action::GetLocations,
        Action::Query911,
        Action::Validate911,
        Action::GetProvisioningHistory,
        Action::Query911Alert,
        Action::Add911Alert,
        Action::ProvisionLocation,
        Action::AddLocation,
        Action::RemoveLocation,
        Action::Update911,
        Action::Insert911,
        Action::Remove911,
    ];

    let calls = executor.calls().await;
    assert_eq!(calls.len(), expected_actions.len());

    for ((outcome, call), action) in outcomes.into_iter().zip(&calls).zip(expected_actions) {
        let outcome = require_ok!(outcome, "{action} 调用失败");
        assert_eq!(outcome.action(), action);
        assert_eq!(call.action, action);
        assert_eq!(
            sorted_keys(&call.arguments),
            expected_keys(action.required_params()),
            "{action} 参数 key 不匹配"
        );
    }
}

#[tokio::test]
async fn test_address_operations_carry_values() {
    let (client, executor) = production_client();
    let address = test_address();

    require_ok!(client.insert_911(TEST_DID, &address).await);
    require_ok!(client.validate_911(&address).await);

    let calls = executor.calls().await;
    let insert = &calls[0].arguments;
    assert_eq!(insert["did"], TEST_DID);
    assert_eq!(insert["address1"], "400 Broad St");
    assert_eq!(insert["address2"], "Suite 100");
    assert_eq!(insert["city"], "Seattle");
    assert_eq!(insert["state"], "WA");
    assert_eq!(insert["zip"], "98109");
    assert_eq!(insert["plus_four"], "4607");
    assert_eq!(insert["caller_name"], "Space Needle");

    let validate = &calls[1].arguments;
    assert!(!validate.contains_key("did"));
    assert_eq!(validate.len(), 7);
}

#[tokio::test]
async fn test_location_argument_order_independent() {
    let (client, executor) = production_client();

    require_ok!(client.provision_location(TEST_DID, "L-1").await);
    require_ok!(client.remove_location("L-2", TEST_DID).await);

    let calls = executor.calls().await;
    assert_eq!(calls[0].arguments["location_id"], "L-1");
    assert_eq!(calls[0].arguments["did"], TEST_DID);
    assert_eq!(calls[1].arguments["location_id"], "L-2");
    assert_eq!(calls[1].arguments["did"], TEST_DID);
}

// ============ 动态参数校验 ============

#[tokio::test]
async fn test_call_with_text_values() {
    let (client, executor) = production_client();
    let values = require_some!(json!({ "did": TEST_DID }).as_object().cloned());

    let outcome = require_ok!(client.call(Action::Query911, &values).await);
    assert_eq!(outcome.action(), Action::Query911);
    assert_eq!(executor.call_count().await, 1);
}

#[tokio::test]
async fn test_call_rejects_every_non_text_param() {
    let (client, executor) = production_client();

    for action in Action::ALL {
        if !action.is_implemented() {
            continue;
        }
        for &bad in action.required_params() {
            let mut values = serde_json::Map::new();
            for &param in action.required_params() {
                values.insert(param.to_string(), json!("x"));
            }
            values.insert(bad.to_string(), json!(12345));

            let result = client.call(action, &values).await;
            assert!(
                matches!(&result, Err(X911Error::InvalidArgument { param, .. }) if param == bad),
                "{action}/{bad}: {result:?}"
            );
        }
    }

    assert_eq!(executor.call_count().await, 0, "校验失败时不应调用 executor");
}

#[tokio::test]
async fn test_call_audit_without_arguments() {
    let (client, executor) = production_client();

    require_ok!(client.call(Action::Audit911, &serde_json::Map::new()).await);
    assert_eq!(executor.call_count().await, 1);
}

// ============ 未实现 / 环境 ============

#[tokio::test]
async fn test_remove_911_alert_not_implemented() {
    let (client, executor) = production_client();

    let direct = client.remove_911_alert(TEST_DID, "noc@example.com").await;
    assert!(matches!(direct, Err(X911Error::NotImplemented { ref action }) if action == "remove911_alert"));

    let values = require_some!(
        json!({ "tn": TEST_DID, "email": "noc@example.com" })
            .as_object()
            .cloned()
    );
    let dynamic = client.call(Action::Remove911Alert, &values).await;
    assert!(matches!(dynamic, Err(X911Error::NotImplemented { .. })));

    let garbage = require_some!(json!({ "tn": 1 }).as_object().cloned());
    let garbage = client.call(Action::Remove911Alert, &garbage).await;
    assert!(matches!(garbage, Err(X911Error::NotImplemented { .. })));

    assert_eq!(executor.call_count().await, 0);
}

#[tokio::test]
async fn test_sandbox_refuses_everything() {
    let executor = RecordingExecutor::new();
    let client = X911Client::builder(Arc::clone(&executor))
        .environment(Environment::Sandbox)
        .build();

    let results = vec![
        client.audit_911().await,
        client.get_locations(TEST_DID).await,
        client.insert_911(TEST_DID, &test_address()).await,
    ];
    for result in results {
        assert!(matches!(result, Err(X911Error::UnsupportedAction { .. })));
    }
    assert_eq!(executor.call_count().await, 0);
}

// ============ 响应读取 ============

#[tokio::test]
async fn test_response_collections() {
    let (client, executor) = production_client();
    executor
        .reply(json!({
            "vi_locations": {
                "collection": [
                    {
                        "location_id": "L-1",
                        "address1": "400 Broad St",
                        "city": "Seattle",
                        "state": "WA",
                        "status": "GEOCODED",
                        "activated_at": "2024-03-05 10:11:12"
                    },
                    { "location_id": "L-2", "status": "INVALID" }
                ]
            }
        }))
        .await;

    let outcome = require_ok!(client.get_locations(TEST_DID).await);
    let locations = outcome.vi_locations();
    assert_eq!(locations.len(), 2);
    assert_eq!(locations[0].location_id, "L-1");
    assert!(locations[0].is_provisionable());
    assert!(locations[0].activated_at.is_some());
    assert_eq!(locations[1].status, LocationStatus::Invalid);
    assert!(!locations[1].is_removable());

    assert!(outcome.dids_911().is_empty());
    assert!(outcome.statuses_911().is_empty());
}

#[tokio::test]
async fn test_provisioning_history_statuses() {
    let (client, executor) = production_client();
    executor
        .reply(json!({
            "statuses": [
                { "did": TEST_DID, "code": 100, "description": "Provisioned", "timestamp": "2024-03-05T10:11:12Z" },
                { "did": TEST_DID, "code": "200", "description": "Removed" }
            ]
        }))
        .await;

    let outcome = require_ok!(client.get_provisioning_history(TEST_DID).await);
    let statuses = outcome.statuses_911();
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0].code, Some(100));
    assert!(statuses[0].timestamp.is_some());
    assert_eq!(statuses[1].code, Some(200));
    assert_eq!(statuses[1].timestamp, None);
}

#[tokio::test]
async fn test_each_call_returns_independent_outcome() {
    let (client, executor) = production_client();
    executor
        .reply(json!({ "dids_911": [{ "did": TEST_DID }] }))
        .await;
    executor.reply(json!({ "response_code": 100 })).await;

    let query = require_ok!(client.query_911(TEST_DID).await);
    let validate = require_ok!(client.validate_911(&test_address()).await);

    assert_eq!(query.dids_911().len(), 1);
    assert_eq!(query.action(), Action::Query911);
    assert!(validate.dids_911().is_empty());
    assert_eq!(
        require_ok!(validate.validation_status()),
        Some(ValidationStatus::Registered)
    );
}

#[tokio::test]
async fn test_validation_status_not_registered() {
    let (client, executor) = production_client();
    executor.reply(json!({ "response_code": 101 })).await;

    let outcome = require_ok!(client.validate_911(&test_address()).await);
    assert_eq!(
        require_ok!(outcome.x911_validation_status()),
        Some("The 911 address is not registered.")
    );
}

#[tokio::test]
async fn test_validation_status_after_other_action() {
    let (client, executor) = production_client();
    executor.reply(json!({ "response_code": 100 })).await;

    let outcome = require_ok!(client.audit_911().await);
    assert!(matches!(
        outcome.x911_validation_status(),
        Err(X911Error::InvalidSequence { .. })
    ));
}

#[tokio::test]
async fn test_validation_status_without_response_code() {
    let (client, executor) = production_client();
    executor.reply(json!({})).await;

    let outcome = require_ok!(client.validate_911(&test_address()).await);
    assert_eq!(require_ok!(outcome.validation_status()), None);
    assert_eq!(require_ok!(outcome.x911_validation_status()), None);
}

// ============ 宽松解码 ============

#[tokio::test]
async fn test_null_and_numeric_fields_decode() {
    let (client, executor) = production_client();
    executor
        .reply(json!({
            "dids_911": {
                "collection": [
                    { "did": TEST_DID, "address1": "400 Broad St", "address2": null },
                    { "did": 2_065_559_876_u64, "city": null }
                ]
            }
        }))
        .await;

    let outcome = require_ok!(client.query_911(TEST_DID).await);
    let dids = outcome.dids_911();
    assert_eq!(dids.len(), 2);
    assert_eq!(dids[0].did, TEST_DID);
    assert_eq!(dids[0].address2, "");
    assert_eq!(dids[1].did, "2065559876");
    assert_eq!(dids[1].city, "");
}

#[tokio::test]
async fn test_blank_collection_keeps_validation_status() {
    let (client, executor) = production_client();
    executor
        .reply(json!({ "response_code": 100, "dids_911": "" }))
        .await;

    let outcome = require_ok!(client.validate_911(&test_address()).await);
    assert!(outcome.dids_911().is_empty());
    assert_eq!(
        require_ok!(outcome.x911_validation_status()),
        Some("The 911 address is valid and registered.")
    );
}

// ============ executor 错误透传 ============

#[tokio::test]
async fn test_executor_errors_pass_through() {
    let (client, executor) = production_client();
    executor
        .fail(X911Error::RemoteFault {
            action: "insert911".to_string(),
            raw_code: Some("113".to_string()),
            raw_message: "Location could not be geocoded".to_string(),
        })
        .await;
    executor
        .fail(X911Error::Timeout {
            action: "query911".to_string(),
            detail: "30s elapsed".to_string(),
        })
        .await;

    let insert = client.insert_911(TEST_DID, &test_address()).await;
    assert!(matches!(
        insert,
        Err(X911Error::RemoteFault { raw_code: Some(ref code), .. }) if code == "113"
    ));

    let query = client.query_911(TEST_DID).await;
    assert!(matches!(query, Err(X911Error::Timeout { .. })));

    assert_eq!(executor.call_count().await, 2);
}
