//! CRUD methods synthesized for legacy `service A, B with Name` declarations.

use crate::model::{Map, Value};
use crate::names::NameTransform;

fn option(map: &mut Map, name: &str, value: &str) {
    let mut options = Map::new();
    options.insert(name.to_string(), Value::from(value));
    let mut entry = Map::new();
    entry.insert("name".to_string(), Value::from(name));
    entry.insert("value".to_string(), Value::from(value));
    map.insert("options".to_string(), Value::Map(options));
    map.insert("optionsList".to_string(), Value::List(vec![Value::Map(entry)]));
}

fn method(name: String, service_name: &str) -> Map {
    let mut map = Map::new();
    map.insert("name".to_string(), Value::String(name));
    map.insert("serviceName".to_string(), Value::from(service_name));
    map
}

/// The five CRUD methods of one entity, in declaration order.
pub fn entity_methods(names: &dyn NameTransform, service_name: &str, entity: &str) -> Vec<Map> {
    let entity = entity.trim();
    let path = format!("/{}", names.kebab_case(&names.pluralize(&entity.to_lowercase())));
    let id_path = format!("{}/{{{}Id}}", path, names.instance_name(entity));

    let mut create = method(format!("create{}", entity), service_name);
    create.insert("parameter".to_string(), Value::from(entity));
    create.insert("returnType".to_string(), Value::from(entity));
    option(&mut create, "post", &path);

    let mut update = method(format!("update{}", entity), service_name);
    update.insert("paramId".to_string(), Value::from("id"));
    update.insert("parameter".to_string(), Value::from(entity));
    update.insert("returnType".to_string(), Value::from(entity));
    update.insert("returnTypeIsOptional".to_string(), Value::Bool(true));
    option(&mut update, "put", &id_path);

    let mut get = method(format!("get{}", entity), service_name);
    get.insert("paramId".to_string(), Value::from("id"));
    get.insert("returnType".to_string(), Value::from(entity));
    get.insert("returnTypeIsOptional".to_string(), Value::Bool(true));
    option(&mut get, "get", &id_path);

    let mut list = method(format!("list{}", names.pluralize(entity)), service_name);
    list.insert("paginated".to_string(), Value::Bool(true));
    list.insert("returnType".to_string(), Value::from(entity));
    list.insert("returnTypeIsArray".to_string(), Value::Bool(true));
    option(&mut list, "get", &path);

    let mut delete = method(format!("delete{}", entity), service_name);
    delete.insert("paramId".to_string(), Value::from("id"));
    option(&mut delete, "delete", &id_path);

    vec![create, update, get, list, delete]
}

/// CRUD methods for every entity, keyed by method name.
pub fn crud_methods(names: &dyn NameTransform, service_name: &str, entities: &[String]) -> Map {
    let mut methods = Map::new();
    for entity in entities {
        for method in entity_methods(names, service_name, entity) {
            let name = method
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            methods.insert(name, Value::Map(method));
        }
    }
    methods
}
