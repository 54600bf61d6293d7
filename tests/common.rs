use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use flood_adventure::build_server_with_state;
use flood_adventure::game::{Campaign, Catalog, ManualClock, Timing};
use flood_adventure::web::AppState;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// Server over the built-in catalog, driven by a clock the test moves by hand.
pub fn setup_server() -> (TestServer, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let catalog = Catalog::builtin().expect("built-in catalog is valid");
    let state = AppState::new(Campaign::new(&catalog), Timing::default(), clock.clone());
    let server = build_server_with_state(state, false).1;
    (TestServer::new(server).unwrap(), clock)
}

#[derive(Debug)]
pub struct FlowContext {
    pub store: HashMap<&'static str, Value>, // a way to pass data between steps
}

impl FlowContext {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
        }
    }

    pub fn store(&mut self, key: &'static str, val: Value) {
        self.store.insert(key, val);
    }

    pub fn get(&self, key: &str) -> &Value {
        self.store.get(key).expect("missing store key")
    }

    #[allow(unused)]
    pub fn get_json<'de, T>(&self, key: &str) -> T
    where
        T: DeserializeOwned,
    {
        let obj = self.get(key);
        let de: T = serde_json::from_value(obj.clone()).expect("Invalid json format");
        de
    }

    /// Path of the run saved under `key`, followed by `suffix`.
    pub fn run_path(&self, key: &str, suffix: &str) -> String {
        let id = self.get(key)["id"].as_str().expect("run has no id");
        format!("/api/v1/runs/{id}{suffix}")
    }
}

pub struct Action {
    pub name: &'static str,
    pub method: &'static str,
    pub path: String,
    pub dyn_path: Option<Box<dyn Fn(&FlowContext) -> String + Send + Sync>>,
    pub body: Option<Value>,
    pub expect: StatusCode,
    pub wait: Option<Duration>,
    pub body_asserts: Vec<Box<dyn Fn(&str) + Send + Sync>>,
    pub save_as: Option<&'static str>,
}

impl Action {
    pub fn new(name: &'static str, method: &'static str, path: &'static str) -> Self {
        Self {
            name,
            method,
            path: path.to_string(),
            dyn_path: None,
            body: None,
            expect: StatusCode::OK,
            wait: None,
            body_asserts: vec![],
            save_as: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_expect(mut self, expect: StatusCode) -> Self {
        self.expect = expect;
        self
    }

    pub fn with_dyn_path<F>(mut self, f: F) -> Self
    where
        F: Fn(&FlowContext) -> String + Send + Sync + 'static,
    {
        self.dyn_path = Some(Box::new(f));
        self
    }

    /// Moves the clock forward before sending the request.
    pub fn after(mut self, wait: Duration) -> Self {
        self.wait = Some(wait);
        self
    }

    pub fn with_save_as(mut self, key: &'static str) -> Self {
        self.save_as = Some(key);
        self
    }

    pub fn assert_body<F>(mut self, check: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.body_asserts.push(Box::new(check));
        self
    }
}

pub struct Flow {
    actions: Vec<Action>,
}

impl Flow {
    pub fn new() -> Self {
        Self { actions: vec![] }
    }

    pub fn step(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub async fn run(self, server: &TestServer, clock: &ManualClock) {
        let mut ctx = FlowContext::new(); // create new context for this flow
        for action in self.actions {
            println!("==> Running test action `{}`", action.name);

            if let Some(wait) = action.wait {
                clock.advance(wait);
            }

            let path = if let Some(dyn_path_fn) = action.dyn_path {
                dyn_path_fn(&ctx)
            } else {
                action.path.clone()
            };

            let mut req = match action.method {
                "GET" => server.get(&path),
                "POST" => server.post(&path),
                "DELETE" => server.delete(&path),
                _ => panic!("unsupported method {}", action.method),
            };

            if let Some(json) = action.body {
                req = req.json(&json);
            }

            let resp = req.await;
            resp.assert_status(action.expect);

            if !action.body_asserts.is_empty() {
                let body = resp.json::<Value>();
                let body = serde_json::to_string(&body)
                    .unwrap_or_else(|_| panic!("Unable to serialize body to string"));
                for check in action.body_asserts {
                    check(&body);
                }
            }

            if let Some(save_key) = action.save_as {
                let body = resp.json::<Value>();
                ctx.store(save_key, body);
            }
        }
    }
}

// Common actions builders

pub fn create_run_action(level_id: u32) -> Action {
    Action::new("create_run", "POST", "/api/v1/runs")
        .with_body(json!({ "level_id": level_id }))
        .with_expect(StatusCode::CREATED)
}

/// POST to `suffix` of the run saved as "run".
#[allow(unused)]
pub fn run_action(name: &'static str, suffix: &'static str) -> Action {
    Action::new(name, "POST", "").with_dyn_path(move |ctx| ctx.run_path("run", suffix))
}

#[allow(unused)]
pub fn answer_action(option_index: usize) -> Action {
    run_action("answer", "/answer").with_body(json!({ "option_index": option_index }))
}

#[allow(unused)]
pub fn get_run_action() -> Action {
    Action::new("get_run", "GET", "").with_dyn_path(|ctx| ctx.run_path("run", ""))
}

pub fn body_json(body: &str) -> Value {
    serde_json::from_str(body).expect("Invalid JSON format")
}
