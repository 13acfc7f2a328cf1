//! Policy document generation
//!
//! Pure value objects rendered from identifiers. Documents are never mutated
//! after creation, only regenerated, so the same input always yields a
//! structurally equal document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const POLICY_VERSION: &str = "2012-10-17";

const FEDERATED_PRINCIPAL: &str = "cognito-identity.amazonaws.com";

/// Placeholder resolved by the provider to the caller's authenticated
/// subject identifier.
pub const AUTHENTICATED_SUBJECT: &str = "${cognito-identity.amazonaws.com:sub}";

/// The canonical item-level action set granted on a table.
pub const TABLE_ACTIONS: [&str; 7] = [
    "dynamodb:BatchGetItem",
    "dynamodb:BatchWriteItem",
    "dynamodb:DeleteItem",
    "dynamodb:GetItem",
    "dynamodb:PutItem",
    "dynamodb:Query",
    "dynamodb:UpdateItem",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub effect: Effect,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,

    pub action: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub resource: Vec<String>,

    // BTreeMaps keep serialization order deterministic.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub condition: BTreeMap<String, BTreeMap<String, ConditionValue>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    #[serde(rename = "Federated")]
    pub federated: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    One(String),
    Many(Vec<String>),
}

fn condition_entry(
    operator: &str,
    key: &str,
    value: ConditionValue,
) -> (String, BTreeMap<String, ConditionValue>) {
    let mut keys = BTreeMap::new();
    keys.insert(key.to_string(), value);
    (operator.to_string(), keys)
}

/// Trust policy granting `sts:AssumeRoleWithWebIdentity` to authenticated
/// federated identities of the given pool.
pub fn assume_role_policy(pool_id: &str) -> PolicyDocument {
    PolicyDocument {
        version: POLICY_VERSION.to_string(),
        statement: vec![Statement {
            effect: Effect::Allow,
            principal: Some(Principal {
                federated: FEDERATED_PRINCIPAL.to_string(),
            }),
            action: vec!["sts:AssumeRoleWithWebIdentity".to_string()],
            resource: Vec::new(),
            condition: BTreeMap::from([
                condition_entry(
                    "StringEquals",
                    "cognito-identity.amazonaws.com:aud",
                    ConditionValue::One(pool_id.to_string()),
                ),
                condition_entry(
                    "ForAnyValue:StringEquals",
                    "cognito-identity.amazonaws.com:amr",
                    ConditionValue::One("authenticated".to_string()),
                ),
            ]),
        }],
    }
}

/// Access policy granting the canonical action set on one table, restricted
/// to rows whose leading key equals the caller's own subject identifier.
/// Row isolation is enforced here, by the provider's authorization layer,
/// not by application code.
pub fn table_access_policy(table_arn: &str) -> PolicyDocument {
    PolicyDocument {
        version: POLICY_VERSION.to_string(),
        statement: vec![Statement {
            effect: Effect::Allow,
            principal: None,
            action: TABLE_ACTIONS.iter().map(|a| a.to_string()).collect(),
            resource: vec![table_arn.to_string()],
            condition: BTreeMap::from([condition_entry(
                "ForAllValues:StringEquals",
                "dynamodb:LeadingKeys",
                ConditionValue::Many(vec![AUTHENTICATED_SUBJECT.to_string()]),
            )]),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assume_role_policy_is_deterministic() {
        let a = assume_role_policy("us-east-1:abcd");
        let b = assume_role_policy("us-east-1:abcd");
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&b).unwrap()
        );
    }

    #[test]
    fn test_assume_role_policy_content() {
        let policy = assume_role_policy("us-east-1:abcd");
        assert_eq!(policy.version, "2012-10-17");
        assert_eq!(policy.statement.len(), 1);

        let statement = &policy.statement[0];
        assert_eq!(statement.effect, Effect::Allow);
        assert_eq!(
            statement.principal.as_ref().unwrap().federated,
            "cognito-identity.amazonaws.com"
        );
        assert_eq!(statement.action, vec!["sts:AssumeRoleWithWebIdentity"]);

        let aud = &statement.condition["StringEquals"]["cognito-identity.amazonaws.com:aud"];
        assert_eq!(*aud, ConditionValue::One("us-east-1:abcd".to_string()));
        let amr =
            &statement.condition["ForAnyValue:StringEquals"]["cognito-identity.amazonaws.com:amr"];
        assert_eq!(*amr, ConditionValue::One("authenticated".to_string()));
    }

    #[test]
    fn test_table_access_policy_content() {
        let arn = "arn:aws:dynamodb:us-east-1:123:table/notes";
        let policy = table_access_policy(arn);

        let statement = &policy.statement[0];
        assert_eq!(statement.action.len(), 7);
        for action in TABLE_ACTIONS {
            assert!(statement.action.iter().any(|a| a == action));
        }
        assert_eq!(statement.resource, vec![arn]);

        let keys = &statement.condition["ForAllValues:StringEquals"]["dynamodb:LeadingKeys"];
        assert_eq!(
            *keys,
            ConditionValue::Many(vec![AUTHENTICATED_SUBJECT.to_string()])
        );
    }

    #[test]
    fn test_serialized_field_names() {
        let policy = table_access_policy("arn:x");
        let value = serde_json::to_value(&policy).unwrap();

        assert_eq!(value["Version"], "2012-10-17");
        assert_eq!(value["Statement"][0]["Effect"], "Allow");
        assert!(value["Statement"][0].get("Principal").is_none());
        assert_eq!(value["Statement"][0]["Resource"][0], "arn:x");
    }
}
