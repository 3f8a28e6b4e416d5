//! Protobuf messages for the RPC backends.
//!
//! Written in the shape `prost-build` emits, with serde derives added so the
//! transcoder can map them to and from JSON (lowerCamelCase field names,
//! missing fields take their protobuf defaults).

/// Messages of the `auth` package.
pub mod auth {
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct EmptyMessage {}

    /// Result of a token check.
    #[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct TokenResponse {
        #[prost(string, tag = "1")]
        pub role: ::prost::alloc::string::String,
        #[prost(int64, tag = "2")]
        pub user_id: i64,
        #[prost(int64, tag = "3")]
        pub person_id: i64,
        /// False when the service answered but rejected the token.
        #[prost(bool, tag = "4")]
        pub valid: bool,
    }

    #[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct LoginRequest {
        #[prost(string, tag = "1")]
        pub username: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub password: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct RegisterRequest {
        #[prost(string, tag = "1")]
        pub username: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub password: ::prost::alloc::string::String,
        #[prost(string, tag = "3")]
        pub email: ::prost::alloc::string::String,
        #[prost(string, tag = "4")]
        pub name: ::prost::alloc::string::String,
        #[prost(string, tag = "5")]
        pub surname: ::prost::alloc::string::String,
        #[prost(string, tag = "6")]
        pub role: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct AuthenticationResponse {
        #[prost(int64, tag = "1")]
        pub id: i64,
        #[prost(string, tag = "2")]
        pub access_token: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct ValidateRequest {
        #[prost(string, tag = "1")]
        pub access_token: ::prost::alloc::string::String,
    }
}

/// Messages of the `tours` package.
pub mod tours {
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct TourExecutionActionRequest {
        #[prost(int64, tag = "1")]
        pub tour_execution_id: i64,
    }

    #[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct TourExecutionResponse {
        #[prost(int64, tag = "1")]
        pub id: i64,
        #[prost(int64, tag = "2")]
        pub tour_id: i64,
        #[prost(int64, tag = "3")]
        pub tourist_id: i64,
        #[prost(string, tag = "4")]
        pub status: ::prost::alloc::string::String,
        #[prost(string, tag = "5")]
        pub last_activity: ::prost::alloc::string::String,
    }
}

/// Messages of the `stakeholders` package.
pub mod stakeholders {
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct UserIdRequest {
        #[prost(int64, tag = "1")]
        pub id: i64,
    }

    #[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct UserResponse {
        #[prost(int64, tag = "1")]
        pub id: i64,
        #[prost(string, tag = "2")]
        pub username: ::prost::alloc::string::String,
        #[prost(string, tag = "3")]
        pub email: ::prost::alloc::string::String,
        #[prost(string, tag = "4")]
        pub role: ::prost::alloc::string::String,
        #[prost(bool, tag = "5")]
        pub is_active: bool,
    }

    #[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct PersonRequest {
        #[prost(int64, tag = "1")]
        pub user_id: i64,
    }

    #[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct Person {
        #[prost(int64, tag = "1")]
        pub id: i64,
        #[prost(int64, tag = "2")]
        pub user_id: i64,
        #[prost(string, tag = "3")]
        pub name: ::prost::alloc::string::String,
        #[prost(string, tag = "4")]
        pub surname: ::prost::alloc::string::String,
        #[prost(string, tag = "5")]
        pub email: ::prost::alloc::string::String,
        #[prost(string, tag = "6")]
        pub profile_image: ::prost::alloc::string::String,
        #[prost(string, tag = "7")]
        pub biography: ::prost::alloc::string::String,
        #[prost(string, tag = "8")]
        pub motto: ::prost::alloc::string::String,
    }
}

#[cfg(test)]
mod tests {
    use super::auth::*;

    #[test]
    fn test_json_uses_camel_case_and_defaults() {
        let req: LoginRequest = serde_json::from_str(r#"{"username":"ana"}"#).unwrap();
        assert_eq!(req.username, "ana");
        assert_eq!(req.password, "");

        let json = serde_json::to_value(TokenResponse {
            role: "guide".into(),
            user_id: 3,
            person_id: 9,
            valid: true,
        })
        .unwrap();
        assert_eq!(json["userId"], 3);
        assert_eq!(json["personId"], 9);
    }
}
