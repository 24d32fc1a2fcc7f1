//! Modifier canonicalization.
//!
//! Every modifier spelling collapses to one of three effects. BEL 1.0
//! activity functions (`kin(...)`) become an activity with a default
//! molecular activity; `sec` and `surf` become translocations between
//! fixed GOCC locations.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};

use super::NodeId;
use super::node::node_attributes;
use crate::grammar::ast::{ActivityAst, Modifier};
use crate::language::{
    CELL_SURFACE, EXTRACELLULAR_SPACE, Entity, INTRACELLULAR, LOCATION_NAMESPACE,
};

/// The molecular activity qualifying an `act(...)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MolecularActivity {
    /// Built-in activity such as `KinaseActivity`.
    Default(String),
    Namespaced(Entity),
}

/// The canonical meaning of a subject or object modifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModifierEffect {
    Activity { effect: Option<MolecularActivity> },
    Degradation,
    Translocation { from_loc: Entity, to_loc: Entity },
}

fn entity_value(entity: &Entity) -> Value {
    json!({ "namespace": entity.namespace, "name": entity.name })
}

impl ModifierEffect {
    pub fn translocation(from_loc: Entity, to_loc: Entity) -> Self {
        ModifierEffect::Translocation { from_loc, to_loc }
    }

    /// The `{modifier, effect}` mapping stored on edges.
    pub fn to_value(&self) -> Value {
        match self {
            ModifierEffect::Activity { effect } => {
                let mut effect_map = Map::new();
                match effect {
                    Some(MolecularActivity::Default(name)) => {
                        effect_map.insert("MolecularActivity".into(), Value::String(name.clone()));
                    }
                    Some(MolecularActivity::Namespaced(entity)) => {
                        effect_map.insert("MolecularActivity".into(), entity_value(entity));
                    }
                    None => {}
                }
                json!({ "modifier": "Activity", "effect": effect_map })
            }
            ModifierEffect::Degradation => json!({ "modifier": "Degradation" }),
            ModifierEffect::Translocation { from_loc, to_loc } => json!({
                "modifier": "Translocation",
                "effect": {
                    "fromLoc": entity_value(from_loc),
                    "toLoc": entity_value(to_loc),
                },
            }),
        }
    }
}

impl Serialize for ModifierEffect {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

fn location(name: &str) -> Entity {
    Entity::new(LOCATION_NAMESPACE, name)
}

/// Collapse a parsed modifier into its canonical effect.
pub fn canonicalize_modifier(modifier: &Modifier) -> ModifierEffect {
    match modifier {
        Modifier::Activity { activity } => ModifierEffect::Activity {
            effect: activity.as_ref().map(|a| match a {
                ActivityAst::Default(name) => MolecularActivity::Default(name.clone()),
                ActivityAst::Namespaced(entity) => MolecularActivity::Namespaced(entity.clone()),
            }),
        },
        Modifier::LegacyActivity { label } => ModifierEffect::Activity {
            effect: Some(MolecularActivity::Default(label.clone())),
        },
        Modifier::Degradation => ModifierEffect::Degradation,
        Modifier::Translocation { from, to } => ModifierEffect::translocation(from.clone(), to.clone()),
        Modifier::CellSecretion => {
            ModifierEffect::translocation(location(INTRACELLULAR), location(EXTRACELLULAR_SPACE))
        }
        Modifier::CellSurfaceExpression => {
            ModifierEffect::translocation(location(INTRACELLULAR), location(CELL_SURFACE))
        }
    }
}

/// Participants of a reaction, in written order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ReactionEffect {
    pub reactants: Vec<NodeId>,
    pub products: Vec<NodeId>,
}

impl ReactionEffect {
    /// `{reactants: [...], products: [...]}`, each participant rendered as
    /// its node attributes (`function`, `identifier`, ...).
    pub fn to_value(&self) -> Value {
        let render = |ids: &[NodeId]| ids.iter().map(|id| json!(node_attributes(id))).collect::<Vec<_>>();
        json!({
            "reactants": render(&self.reactants),
            "products": render(&self.products),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::parser::{ParserConfig, parse_term};
    use crate::namespace::AllowAll;

    fn effect(input: &str) -> Value {
        let term = parse_term(input, &AllowAll, &ParserConfig::default()).unwrap();
        canonicalize_modifier(term.modifier().unwrap()).to_value()
    }

    #[test]
    fn bare_activity_has_empty_effect() {
        assert_eq!(
            effect("act(p(HGNC:AKT1))"),
            json!({ "modifier": "Activity", "effect": {} })
        );
    }

    #[test]
    fn legacy_kinase_matches_molecular_activity() {
        let expected = json!({
            "modifier": "Activity",
            "effect": { "MolecularActivity": "KinaseActivity" },
        });
        assert_eq!(effect("kin(p(HGNC:AKT1))"), expected);
        assert_eq!(effect("act(p(HGNC:AKT1), ma(kin))"), expected);
        assert_eq!(effect("act(p(HGNC:AKT1), ma(kinaseActivity))"), expected);
    }

    #[test]
    fn namespaced_activity() {
        assert_eq!(
            effect("act(p(HGNC:AKT1), ma(GOMF:\"catalytic activity\"))"),
            json!({
                "modifier": "Activity",
                "effect": {
                    "MolecularActivity": { "namespace": "GOMF", "name": "catalytic activity" }
                },
            })
        );
    }

    #[test]
    fn degradation_has_no_effect_key() {
        assert_eq!(effect("deg(p(HGNC:AKT1))"), json!({ "modifier": "Degradation" }));
    }

    #[test]
    fn translocation_forms_canonicalize_identically() {
        let expected = json!({
            "modifier": "Translocation",
            "effect": {
                "fromLoc": { "namespace": "GOCC", "name": "cell surface" },
                "toLoc": { "namespace": "GOCC", "name": "endosome" },
            },
        });
        assert_eq!(
            effect("tloc(p(HGNC:EGFR), fromLoc(GOCC:\"cell surface\"), toLoc(GOCC:endosome))"),
            expected
        );
        assert_eq!(
            effect("tloc(p(HGNC:EGFR), GOCC:\"cell surface\", GOCC:endosome)"),
            expected
        );
    }

    #[test]
    fn secretion_and_surface_expression() {
        assert_eq!(
            effect("sec(p(HGNC:EGFR))"),
            json!({
                "modifier": "Translocation",
                "effect": {
                    "fromLoc": { "namespace": "GOCC", "name": "intracellular" },
                    "toLoc": { "namespace": "GOCC", "name": "extracellular space" },
                },
            })
        );
        assert_eq!(
            effect("surf(p(HGNC:EGFR))")["effect"]["toLoc"]["name"],
            json!("cell surface")
        );
    }

    #[test]
    fn reaction_participants_are_mappings() {
        use crate::language::Function;

        let effect = ReactionEffect {
            reactants: vec![NodeId::named(Function::Abundance, "CHEBI", "superoxide")],
            products: vec![
                NodeId::named(Function::Abundance, "CHEBI", "hydrogen peroxide"),
                NodeId::named(Function::Abundance, "CHEBI", "oxygen"),
            ],
        };
        let value = effect.to_value();
        let reactant = &value["reactants"][0];
        assert_eq!(reactant["function"], json!("Abundance"));
        assert_eq!(
            reactant["identifier"],
            json!({ "namespace": "CHEBI", "name": "superoxide" })
        );
        assert_eq!(value["products"][1]["identifier"]["name"], json!("oxygen"));
        assert_eq!(value["products"].as_array().map(Vec::len), Some(2));
    }
}
