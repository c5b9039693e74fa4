#![allow(dead_code)]

use async_trait::async_trait;
use cordo_intake::{
    Catalog, Category, CheckoutSession, ClientInfo, CreatedOrder, InMemorySnapshotStore,
    IntakeTransport, OrderCreated, OrderPayload, PairId, PersistenceGateway, PhotoRef,
    PhotoSettings, TransportError, UploadPhotoRequest, UploadPhotoResponse, WizardSession,
};
use std::collections::VecDeque;
use std::sync::Mutex;

pub const CATALOG_JSON: &str = r#"{
    "HOMME": [
        {"id": 1, "nom": "Ressemelage complet", "prix": 65.00},
        {"id": 2, "nom": "Patins", "prix": "22.50"},
        {"id": 3, "nom": "Autre demande", "prix": 0, "sur_devis": true}
    ],
    "FEMME": [
        {"id": 10, "nom": "Talons", "prix": 10.00},
        {"id": 11, "nom": "Teinture", "prix": 15.00},
        {"id": 12, "nom": "Sur mesure", "prix": 30.00, "requires_note": true}
    ]
}"#;

pub fn catalog() -> Catalog {
    Catalog::from_json_str(CATALOG_JSON).unwrap()
}

pub fn photo(name: &str) -> PhotoRef {
    PhotoRef {
        url: format!("https://cdn.example.fr/{name}"),
        filename: name.to_string(),
    }
}

pub fn client() -> ClientInfo {
    ClientInfo {
        name: "Camille Durand".into(),
        email: "camille@example.fr".into(),
        phone: "0601020304".into(),
        company: Some("Atelier Durand".into()),
    }
}

pub fn session(store: InMemorySnapshotStore) -> WizardSession<InMemorySnapshotStore> {
    WizardSession::open(catalog(), PersistenceGateway::new(store), PhotoSettings::default())
}

/// Fill and validate one pair with the given services
pub fn complete_pair(
    session: &mut WizardSession<InMemorySnapshotStore>,
    pair_id: PairId,
    category: Category,
    services: &[i64],
) {
    session.set_category(pair_id, category).unwrap();
    for id in services {
        session.toggle_service(pair_id, *id).unwrap();
    }
    session.set_photo(pair_id, photo("pair.jpg")).unwrap();
    session.validate_pair(pair_id).unwrap();
}

/// Transport that answers from scripted queues and records what it was sent
#[derive(Default)]
pub struct ScriptedTransport {
    pub orders: Mutex<VecDeque<Result<OrderCreated, TransportError>>>,
    pub checkouts: Mutex<VecDeque<Result<CheckoutSession, TransportError>>>,
    pub sent_orders: Mutex<Vec<OrderPayload>>,
    pub checkout_calls: Mutex<Vec<i64>>,
}

impl ScriptedTransport {
    pub fn order(self, result: Result<i64, TransportError>) -> Self {
        self.orders.lock().unwrap().push_back(result.map(|id| OrderCreated {
            commande: CreatedOrder { id, statut: Some("en_attente".into()) },
        }));
        self
    }

    pub fn checkout(self, result: Result<&str, TransportError>) -> Self {
        self.checkouts.lock().unwrap().push_back(result.map(|url| CheckoutSession {
            checkout_url: url.to_string(),
            session_id: None,
        }));
        self
    }

    pub fn order_count(&self) -> usize {
        self.sent_orders.lock().unwrap().len()
    }

    pub fn checkout_calls(&self) -> Vec<i64> {
        self.checkout_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IntakeTransport for ScriptedTransport {
    async fn upload_photo(
        &self,
        request: UploadPhotoRequest,
    ) -> Result<UploadPhotoResponse, TransportError> {
        Ok(UploadPhotoResponse {
            photo_url: format!("https://cdn.example.fr/{}.jpg", request.photo.len()),
            filename: format!("{}.jpg", request.photo.len()),
        })
    }

    async fn create_order(&self, payload: OrderPayload) -> Result<OrderCreated, TransportError> {
        self.sent_orders.lock().unwrap().push(payload);
        self.orders
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted order".into())))
    }

    async fn create_checkout(&self, order_id: i64) -> Result<CheckoutSession, TransportError> {
        self.checkout_calls.lock().unwrap().push(order_id);
        self.checkouts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted checkout".into())))
    }
}
