use std::io::Write;

use automap::{
    AssignError, AutomapConfig, Construct, ConstructError, FactoryInput, Mapped, Model, ModelRef,
    map_json_str, map_json_str_into,
};
use chrono::{DateTime, TimeZone, Utc};
use tempfile::NamedTempFile;

#[derive(Debug, Default)]
struct Customer {
    full_name: String,
    email: Option<String>,
}

impl Model for Customer {
    fn properties(&self) -> &'static [&'static str] {
        &["fullName", "email"]
    }

    fn assign(&mut self, property: &str, value: Mapped) -> Result<(), AssignError> {
        match property {
            "fullName" => self.full_name = value.into_data()?,
            "email" => self.email = value.into_data()?,
            other => return Err(AssignError::UnknownProperty(other.to_string())),
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct OrderLine {
    sku: String,
    unit_price: f64,
    quantity: u32,
}

impl Model for OrderLine {
    fn properties(&self) -> &'static [&'static str] {
        &["sku", "unitPrice", "quantity"]
    }

    fn assign(&mut self, property: &str, value: Mapped) -> Result<(), AssignError> {
        match property {
            "sku" => self.sku = value.into_data()?,
            "unitPrice" => self.unit_price = value.into_data()?,
            "quantity" => self.quantity = value.into_data()?,
            other => return Err(AssignError::UnknownProperty(other.to_string())),
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Timestamp(DateTime<Utc>);

impl Model for Timestamp {
    fn properties(&self) -> &'static [&'static str] {
        &[]
    }

    fn assign(&mut self, property: &str, _value: Mapped) -> Result<(), AssignError> {
        Err(AssignError::UnknownProperty(property.to_string()))
    }
}

impl Construct for Timestamp {
    fn construct(input: FactoryInput<'_>) -> Result<Self, ConstructError> {
        let raw: String = input.deserialize()?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| Timestamp(parsed.with_timezone(&Utc)))
            .map_err(|err| ConstructError::Invalid(err.to_string()))
    }
}

#[derive(Debug, Default)]
struct Order {
    order_id: String,
    customer: Option<Customer>,
    lines: Vec<OrderLine>,
    placed_at: Option<Timestamp>,
    internal_note: Option<String>,
}

impl Model for Order {
    fn properties(&self) -> &'static [&'static str] {
        &["orderId", "customer", "lines", "placedAt", "internalNote"]
    }

    fn assign(&mut self, property: &str, value: Mapped) -> Result<(), AssignError> {
        match property {
            "orderId" => self.order_id = value.into_data()?,
            "customer" => self.customer = value.into_optional_model()?,
            "lines" => self.lines = value.into_models()?,
            "placedAt" => self.placed_at = value.into_optional_model()?,
            "internalNote" => self.internal_note = value.into_data()?,
            other => return Err(AssignError::UnknownProperty(other.to_string())),
        }
        Ok(())
    }

    fn default_type(&self, property: &str) -> Option<ModelRef> {
        match property {
            "customer" => Some(ModelRef::defaulted::<Customer>()),
            "lines" => Some(ModelRef::defaulted::<OrderLine>()),
            "placedAt" => Some(ModelRef::of::<Timestamp>()),
            _ => None,
        }
    }
}

const CONFIG: &str = r#"
version: "1.0"
name: "orders"
defaults:
  convention: snake_case
  derive_type: true
types:
  Order:
    define:
      id: orderId
    ignore:
      - internalNote
  OrderLine:
    key_auto_match: true
"#;

const ORDER: &str = r#"{
    "id": "A-1",
    "customer": { "full_name": "Ada Lovelace", "email": "ada@example.com" },
    "lines": [
        { "sku": "X-1", "unitPrice": 2.5, "QUANTITY": 2 },
        { "sku": "Y-2", "unit_price": 1.0, "quantity": 1 }
    ],
    "placed_at": "2024-05-01T10:00:00Z",
    "internal_note": "do not map"
}"#;

fn order() -> ModelRef {
    ModelRef::defaulted::<Order>()
}

fn configured_mapper(config: &AutomapConfig) -> automap::Mapper {
    let mut mapper = config.build_mapper().expect("mapper from config");
    config.register(&mut mapper, order()).expect("register order");
    config
        .register(&mut mapper, ModelRef::defaulted::<OrderLine>())
        .expect("register order line");
    mapper
}

fn assert_order(order: &Order) {
    assert_eq!(order.order_id, "A-1");

    let customer = order.customer.as_ref().expect("customer mapped");
    assert_eq!(customer.full_name, "Ada Lovelace");
    assert_eq!(customer.email.as_deref(), Some("ada@example.com"));

    assert_eq!(order.lines.len(), 2);
    assert_eq!(order.lines[0].sku, "X-1");
    assert_eq!(order.lines[0].unit_price, 2.5);
    assert_eq!(order.lines[0].quantity, 2);
    assert_eq!(order.lines[1].unit_price, 1.0);

    let placed_at = order.placed_at.as_ref().expect("timestamp mapped");
    let expected = Utc
        .with_ymd_and_hms(2024, 5, 1, 10, 0, 0)
        .single()
        .expect("valid date");
    assert_eq!(placed_at.0, expected);

    assert!(order.internal_note.is_none());
}

#[test]
fn yaml_configured_pipeline_maps_nested_order() {
    let config = AutomapConfig::from_yaml(CONFIG).expect("config parses");
    let mut mapper = configured_mapper(&config);

    let order: Order = map_json_str_into(&mut mapper, ORDER, order()).expect("order maps");
    assert_order(&order);

    let registered = mapper.registered(&ModelRef::defaulted::<Order>()).unwrap();
    assert_eq!(registered.external_key("orderId"), Some("id"));
    assert_eq!(registered.external_key("placedAt"), Some("placed_at"));
    assert!(mapper.is_registered(&ModelRef::defaulted::<Customer>()));
}

#[test]
fn config_file_drives_batch_mapping() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(CONFIG.as_bytes()).unwrap();
    let config = AutomapConfig::from_file(temp_file.path()).expect("config file loads");
    let mut mapper = configured_mapper(&config);

    let batch = format!("[{ORDER}, {ORDER}, null]");
    let mapped = map_json_str(&mut mapper, &batch, order()).expect("batch maps");
    let Mapped::List(items) = mapped else {
        panic!("expected a list");
    };
    assert_eq!(items.len(), 3);
    assert!(items[2].is_absent());

    for item in items.into_iter().take(2) {
        let order: Order = item.into_model().expect("order instance");
        assert_order(&order);
    }
}

#[test]
fn optimize_prepares_configured_types() {
    let config = AutomapConfig::from_yaml(CONFIG).expect("config parses");
    let mut mapper = configured_mapper(&config);
    mapper.optimize().expect("optimize succeeds");

    let line = mapper
        .registered(&ModelRef::defaulted::<OrderLine>())
        .expect("registered");
    assert!(line.is_parsed());
    assert!(line.options().config.key_auto_match);
    assert_eq!(line.key_mapping("unit_price"), Some("unitPrice"));
}

#[test]
fn unconfigured_types_use_defaults() {
    let config = AutomapConfig::from_yaml(CONFIG).expect("config parses");
    let mut mapper = config.build_mapper().expect("mapper");
    config
        .register(&mut mapper, ModelRef::defaulted::<Customer>())
        .expect("register customer");

    let customer: Customer = map_json_str_into(
        &mut mapper,
        r#"{"full_name": "Grace", "fullName": "ignored"}"#,
        ModelRef::defaulted::<Customer>(),
    )
    .expect("customer maps");
    assert_eq!(customer.full_name, "Grace");
}
