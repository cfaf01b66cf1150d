//! End-to-end tests driving the dispatcher through JSON envelopes.
//!
//! Every request goes in as text and comes back as text, the way the
//! transport hands it to the dispatcher.

use std::sync::Arc;

use serde_json::{Value, json};

use ontoquery::dispatch::Dispatcher;
use ontoquery::oracle::{OracleSettings, OwlOracle};

const FIXTURE: &str = include_str!("fixtures/rice.ttl");
const RESTRICTIONS: &str = include_str!("fixtures/restrictions.ttl");

fn dispatcher() -> Dispatcher {
    dispatcher_for(FIXTURE)
}

fn dispatcher_for(turtle: &str) -> Dispatcher {
    let oracle = OwlOracle::from_turtle_str(turtle, &OracleSettings::default()).unwrap();
    Dispatcher::new(Arc::new(oracle), "name").unwrap()
}

fn ask(dispatcher: &Dispatcher, request: Value) -> Value {
    let reply = dispatcher.process(&request.to_string());
    serde_json::from_str(&reply).unwrap()
}

fn ids(payload: &Value) -> Vec<String> {
    payload
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["Id"].as_str().unwrap().to_string())
        .collect()
}

fn assert_fail(response: &Value) {
    assert_eq!(response["Status"], "Fail", "{response}");
    assert!(response.get("Data").is_none());
    assert!(!response["Message"].as_str().unwrap().is_empty());
}

#[test]
fn thing_always_succeeds() {
    let d = dispatcher();
    let response = ask(&d, json!({"Type": "GetClass", "Data": {"Class": "Thing"}}));
    assert_eq!(response["Status"], "Success");
    assert_eq!(response["Data"]["Class"]["Id"], "Thing");
    assert!(response.get("Message").is_none());
}

#[test]
fn class_carries_preferred_label() {
    let d = dispatcher();
    let response = ask(&d, json!({"Type": "GetClass", "Data": {"Class": "Rice"}}));
    assert_eq!(response["Data"]["Class"]["Label"], "Lúa");
    assert_eq!(response["Data"]["Class"]["Type"], "Class");
}

#[test]
fn root_class_direct_super_is_thing() {
    let d = dispatcher();
    let response = ask(
        &d,
        json!({"Type": "GetSuperClasses", "Data": {"Class": "Organism", "GetSuperClassType": "Direct"}}),
    );
    assert_eq!(ids(&response["Data"]["SuperClasses"]), vec!["Thing"]);
}

#[test]
fn super_classes_direct_and_all() {
    let d = dispatcher();
    let direct = ask(
        &d,
        json!({"Type": "GetSuperClasses", "Data": {"Class": "Planthopper", "GetSuperClassType": "Direct"}}),
    );
    assert_eq!(ids(&direct["Data"]["SuperClasses"]), vec!["Insect"]);

    let all = ask(
        &d,
        json!({"Type": "GetSuperClasses", "Data": {"Class": "Planthopper", "GetSuperClassType": "All"}}),
    );
    assert_eq!(
        ids(&all["Data"]["SuperClasses"]),
        vec!["Insect", "Organism", "Pest", "Thing"]
    );
}

#[test]
fn sub_classes_all_contain_direct_and_never_nothing() {
    let d = dispatcher();
    for class in ["Thing", "Organism", "Pest", "Disease", "Location"] {
        let direct = ask(
            &d,
            json!({"Type": "GetSubClasses", "Data": {"Class": class, "GetSubClassType": "Direct"}}),
        );
        let all = ask(
            &d,
            json!({"Type": "GetSubClasses", "Data": {"Class": class, "GetSubClassType": "All"}}),
        );
        let direct = ids(&direct["Data"]["SubClasses"]);
        let all = ids(&all["Data"]["SubClasses"]);
        assert!(direct.iter().all(|c| all.contains(c)), "{class}");
        assert!(!all.iter().any(|c| c == "Nothing"), "{class}");
        assert!(!all.iter().any(|c| c == "Thing"), "{class}");
    }
}

#[test]
fn single_domain_expands_to_sub_classes() {
    let d = dispatcher();
    let direct = ask(
        &d,
        json!({"Type": "GetRelationDomains", "Data": {"Relation": "damagedBy", "GetDomainType": "Direct"}}),
    );
    assert_eq!(ids(&direct["Data"]["RelationDomains"]), vec!["Rice"]);

    let all = ask(
        &d,
        json!({"Type": "GetRelationDomains", "Data": {"Relation": "damagedBy", "GetDomainType": "All"}}),
    );
    assert_eq!(ids(&all["Data"]["RelationDomains"]), vec!["Rice", "StickyRice"]);
}

#[test]
fn restriction_domain_uses_its_filler() {
    let d = dispatcher_for(RESTRICTIONS);
    let direct = ask(
        &d,
        json!({"Type": "GetRelationDomains", "Data": {"Relation": "protects", "GetDomainType": "Direct"}}),
    );
    assert_eq!(ids(&direct["Data"]["RelationDomains"]), vec!["Crop"]);

    let all = ask(
        &d,
        json!({"Type": "GetRelationDomains", "Data": {"Relation": "protects", "GetDomainType": "All"}}),
    );
    assert_eq!(ids(&all["Data"]["RelationDomains"]), vec!["Crop", "Rice"]);

    let relations = ask(&d, json!({"Type": "GetDomainRelations", "Data": {"Class": "Rice"}}));
    assert_eq!(ids(&relations["Data"]["DomainRelations"]), vec!["protects"]);
}

#[test]
fn nested_and_value_restrictions() {
    let d = dispatcher_for(RESTRICTIONS);
    let domains = ask(
        &d,
        json!({"Type": "GetRelationDomains", "Data": {"Relation": "competesWith", "GetDomainType": "Direct"}}),
    );
    assert_eq!(ids(&domains["Data"]["RelationDomains"]), vec!["Pest", "Weed"]);

    let ranges = ask(
        &d,
        json!({"Type": "GetRelationRanges", "Data": {"Relation": "locatedIn", "GetRangeType": "All"}}),
    );
    assert_eq!(ids(&ranges["Data"]["RelationRanges"]), vec!["Region"]);

    let class = ask(
        &d,
        json!({"Type": "GetIndividualClasses", "Data": {"Individual": "Scarecrow", "GetClassType": "Direct"}}),
    );
    assert_eq!(class["Data"]["IndividualClass"]["Id"], "Crop");
}

#[test]
fn ranges_and_attribute_domains() {
    let d = dispatcher();
    let ranges = ask(
        &d,
        json!({"Type": "GetRelationRanges", "Data": {"Relation": "foundIn", "GetRangeType": "All"}}),
    );
    assert_eq!(ids(&ranges["Data"]["RelationRanges"]), vec!["Location", "Province"]);

    let domains = ask(
        &d,
        json!({"Type": "GetAttributeDomains", "Data": {"Attribute": "resistant", "GetDomainType": "All"}}),
    );
    assert_eq!(
        ids(&domains["Data"]["AttributeDomains"]),
        vec!["Plant", "Rice", "StickyRice"]
    );

    let ambiguous = ask(
        &d,
        json!({"Type": "GetAttributeDomains", "Data": {"Attribute": "note", "GetDomainType": "Direct"}}),
    );
    assert_fail(&ambiguous);
}

#[test]
fn inverse_relation_is_symmetric() {
    let d = dispatcher();
    let forward = ask(&d, json!({"Type": "GetInverseRelation", "Data": {"Relation": "damages"}}));
    assert_eq!(forward["Data"]["InverseRelation"]["Id"], "damagedBy");

    let back = ask(&d, json!({"Type": "GetInverseRelation", "Data": {"Relation": "damagedBy"}}));
    assert_eq!(back["Data"]["InverseRelation"]["Id"], "damages");
}

#[test]
fn missing_inverse_is_fail_not_empty_success() {
    let d = dispatcher();
    let response = ask(&d, json!({"Type": "GetInverseRelation", "Data": {"Relation": "treats"}}));
    assert_fail(&response);
    assert_eq!(response["Message"], "Inverse relation of \"treats\" not found.");
}

#[test]
fn missing_attribute_value_names_both() {
    let d = dispatcher();
    let response = ask(
        &d,
        json!({"Type": "GetAttributeValuesByAttributeName", "Data": {"Individual": "Jasmine85", "Attribute": "season"}}),
    );
    assert_fail(&response);
    let message = response["Message"].as_str().unwrap();
    assert!(message.contains("season"));
    assert!(message.contains("Jasmine85"));
}

#[test]
fn attribute_values_by_name() {
    let d = dispatcher();
    let response = ask(
        &d,
        json!({"Type": "GetAttributeValuesByAttributeName", "Data": {"Individual": "IR64", "Attribute": "season"}}),
    );
    assert_eq!(response["Data"]["AttributeValues"], json!(["Hè Thu", "Đông Xuân"]));

    let unknown = ask(
        &d,
        json!({"Type": "GetAttributeValuesByAttributeName", "Data": {"Individual": "IR64", "Attribute": "color"}}),
    );
    assert_eq!(unknown["Message"], "Attribute \"color\" not found.");
}

#[test]
fn relation_values_include_inverse_assertions() {
    let d = dispatcher();
    let response = ask(
        &d,
        json!({"Type": "GetRelationValue", "Data": {"Individual": "IR64", "Relation": "damagedBy"}}),
    );
    assert_eq!(ids(&response["Data"]["RelationValue"]), vec!["BrownPlanthopper"]);
    assert_eq!(response["Data"]["RelationValue"][0]["Label"], "Rầy nâu");

    let all = ask(&d, json!({"Type": "GetRelationValues", "Data": {"Individual": "BrownPlanthopper"}}));
    let pairs = all["Data"]["RelationValues"].as_array().unwrap();
    let relations: Vec<&str> = pairs.iter().map(|p| p["Left"]["Id"].as_str().unwrap()).collect();
    assert_eq!(relations, vec!["coexistsWith", "damages", "foundIn"]);
}

#[test]
fn individual_classes_direct_and_all() {
    let d = dispatcher();
    let direct = ask(
        &d,
        json!({"Type": "GetIndividualClasses", "Data": {"Individual": "IR64", "GetClassType": "Direct"}}),
    );
    assert_eq!(direct["Data"]["IndividualClass"]["Id"], "Rice");

    let all = ask(
        &d,
        json!({"Type": "GetIndividualClasses", "Data": {"Individual": "IR64", "GetClassType": "All"}}),
    );
    assert_eq!(
        ids(&all["Data"]["IndividualClasses"]),
        vec!["Organism", "Plant", "Rice"]
    );

    let ambiguous = ask(
        &d,
        json!({"Type": "GetIndividualClasses", "Data": {"Individual": "Nep87", "GetClassType": "Direct"}}),
    );
    assert_fail(&ambiguous);
}

#[test]
fn class_individuals_and_attributes() {
    let d = dispatcher();
    let direct = ask(
        &d,
        json!({"Type": "GetClassIndividuals", "Data": {"Class": "Rice", "GetIndividualType": "Direct"}}),
    );
    let direct = ids(&direct["Data"]["ClassIndividuals"]);
    assert!(direct.contains(&"IR64".to_string()));
    assert!(direct.contains(&"Jasmine85".to_string()));

    let attributes = ask(&d, json!({"Type": "GetClassAttributes", "Data": {"Class": "Rice"}}));
    let payload = &attributes["Data"]["ClassAttributes"];
    assert_eq!(ids(payload), vec!["resistant", "season"]);
    let season = &payload[1];
    assert_eq!(season["Range"], "Enumerated");
    assert_eq!(season["EnumeratedValues"], json!(["Đông Xuân", "Hè Thu", "Mùa"]));
}

#[test]
fn enumerations() {
    let d = dispatcher();
    let relations = ask(&d, json!({"Type": "GetRelations"}));
    assert_eq!(
        ids(&relations["Data"]["Relations"]),
        vec!["coexistsWith", "damagedBy", "damages", "foundIn", "treats"]
    );
    let attributes = ask(&d, json!({"Type": "GetAttributes"}));
    assert_eq!(
        ids(&attributes["Data"]["Attributes"]),
        vec!["lifespan", "name", "note", "resistant", "season"]
    );
    let individuals = ask(&d, json!({"Type": "GetIndividuals", "Data": {}}));
    assert_eq!(individuals["Data"]["Individuals"].as_array().unwrap().len(), 8);
}

#[test]
fn search_is_accent_and_case_insensitive() {
    let d = dispatcher();
    for keywords in ["ha noi", "HA NOI", "Hà Nội"] {
        let response = ask(&d, json!({"Type": "SearchIndividuals", "Data": {"Keywords": keywords}}));
        let hits = response["Data"]["SearchIndividuals"].as_array().unwrap();
        assert_eq!(hits.len(), 1, "{keywords}");
        assert_eq!(hits[0]["Left"]["Id"], "Ha_Noi");
    }
}

#[test]
fn missing_fields_and_unknown_names_fail_never_error() {
    let d = dispatcher();
    let requests = [
        json!({"Type": "GetClass"}),
        json!({"Type": "GetClass", "Data": {"Class": "Wheat"}}),
        json!({"Type": "GetSuperClasses", "Data": {"Class": "Rice"}}),
        json!({"Type": "GetRelation", "Data": {"Relation": "eats"}}),
        json!({"Type": "GetAttribute", "Data": {}}),
        json!({"Type": "GetIndividual", "Data": {"Individual": "Ghost"}}),
        json!({"Type": "GetRelationValue", "Data": {"Individual": "IR64"}}),
        json!({"Type": "SearchIndividuals", "Data": {"Keywords": "wheat"}}),
        json!({"Type": "GetWeather"}),
        json!({"Data": {}}),
    ];
    for request in requests {
        assert_fail(&ask(&d, request));
    }
}

#[test]
fn identical_requests_give_identical_responses() {
    let d = dispatcher();
    let request = json!({"Type": "SearchIndividuals", "Data": {"Keywords": "lua"}}).to_string();
    assert_eq!(d.process(&request), d.process(&request));

    let request = json!({"Type": "GetSubClasses", "Data": {"Class": "Thing", "GetSubClassType": "All"}})
        .to_string();
    assert_eq!(d.process(&request), d.process(&request));
}
