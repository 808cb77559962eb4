use anyhow::{anyhow, Context};
use modelkit_core::ModelPath;
use modelkit_proxy::{ManagedInstance, ProxyError};
use modelkit_rules::{
    Action, ActionBackedMutateRule, Inputs, ModelAction, ModelReference, ModelRuleDescriptor,
    MutableModelNode, NestedModelRuleDescriptor, SimpleModelRuleDescriptor,
};
use modelkit_test_utils::{create_person, StateOp};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug)]
struct PersonNode {
    path: ModelPath,
}

impl MutableModelNode for PersonNode {
    fn path(&self) -> &ModelPath {
        &self.path
    }
}

fn person_ref() -> ModelReference<ManagedInstance> {
    ModelReference::of("people.ada".parse().unwrap()).with_description("person")
}

fn set_name(person: &mut ManagedInstance) -> Result<(), ProxyError> {
    person.set("name", "Ada")
}

#[test]
fn test_rule_mutates_managed_instance() {
    let rule = ActionBackedMutateRule::new(
        person_ref(),
        set_name,
        SimpleModelRuleDescriptor::shared("name people"),
    );
    let (mut person, state) = create_person();

    rule.execute(None, &mut person, &Inputs::empty()).unwrap();

    assert_eq!(person.get::<String>("name").unwrap(), "Ada");
    assert_eq!(state.ops()[0], StateOp::Set("name".into(), "Ada".into()));
}

#[test]
fn test_execute_matches_direct_action_call() {
    let rule = ActionBackedMutateRule::new(
        person_ref(),
        set_name,
        SimpleModelRuleDescriptor::shared("name people"),
    );
    let node = PersonNode {
        path: "people.ada".parse().unwrap(),
    };

    let (mut via_rule, rule_state) = create_person();
    let (mut direct, direct_state) = create_person();
    rule.execute(Some(&node), &mut via_rule, &Inputs::empty()).unwrap();
    rule.action().execute(&mut direct).unwrap();

    assert_eq!(rule_state.ops(), direct_state.ops());
}

#[test]
fn test_rule_surfaces_illegal_self_mutation_unmodified() {
    let rule = ActionBackedMutateRule::new(
        person_ref(),
        |person: &mut ManagedInstance| person.get::<String>("renamed").map(drop),
        SimpleModelRuleDescriptor::shared("rename via default getter"),
    );
    let (mut person, _) = create_person();

    let err = rule.execute(None, &mut person, &Inputs::empty()).unwrap_err();
    assert_eq!(
        err,
        ProxyError::IllegalSelfMutation {
            type_name: "Person".into(),
            method: "setName".into(),
        }
    );
}

#[test]
fn test_rule_with_anyhow_errors() {
    let rule = ActionBackedMutateRule::new(
        ModelReference::<Vec<String>>::of_type(),
        |tasks: &mut Vec<String>| -> anyhow::Result<()> {
            if tasks.is_empty() {
                return Err(anyhow!("no tasks to configure"));
            }
            tasks.push("check".into());
            Ok(())
        },
        SimpleModelRuleDescriptor::shared("add check"),
    );

    let err = rule
        .execute(None, &mut Vec::new(), &Inputs::empty())
        .context("configuring tasks")
        .unwrap_err();
    assert_eq!(err.root_cause().to_string(), "no tasks to configure");

    let mut tasks = vec!["build".to_string()];
    rule.execute(None, &mut tasks, &Inputs::empty()).unwrap();
    assert_eq!(tasks, vec!["build".to_string(), "check".to_string()]);
}

#[test]
fn test_rule_accessors() {
    let descriptor: Arc<dyn ModelRuleDescriptor> = Arc::new(NestedModelRuleDescriptor::new(
        SimpleModelRuleDescriptor::shared("build script"),
        SimpleModelRuleDescriptor::shared("people { }"),
    ));
    let rule = ActionBackedMutateRule::new(person_ref(), set_name, Arc::clone(&descriptor));

    assert_eq!(rule.subject(), &person_ref());
    assert_eq!(rule.subject().erase().to_string(), person_ref().erase().to_string());
    assert!(rule.inputs().is_empty());
    assert!(Arc::ptr_eq(rule.descriptor(), &descriptor));
    assert_eq!(rule.descriptor().describe(), "build script > people { }");
}

fn run_as_model_action<T, R: ModelAction<T>>(rule: &R, subject: &mut T) -> Result<(), R::Error> {
    rule.execute(None, subject, &Inputs::empty())
}

proptest! {
    #[test]
    fn prop_execute_equals_action(start in any::<i32>(), delta in any::<i32>()) {
        let add = move |n: &mut i64| -> Result<(), String> {
            *n += i64::from(delta);
            Ok(())
        };
        let rule = ActionBackedMutateRule::new(
            ModelReference::<i64>::of_type(),
            add,
            SimpleModelRuleDescriptor::shared("add"),
        );

        let mut via_rule = i64::from(start);
        let mut direct = i64::from(start);
        run_as_model_action(&rule, &mut via_rule).unwrap();
        add.execute(&mut direct).unwrap();
        prop_assert_eq!(via_rule, direct);
    }

    #[test]
    fn prop_errors_propagate_unchanged(message in "[a-z ]{1,24}") {
        let expected = message.clone();
        let rule = ActionBackedMutateRule::new(
            ModelReference::<i64>::of_type(),
            move |_: &mut i64| Err::<(), String>(message.clone()),
            SimpleModelRuleDescriptor::shared("fail"),
        );
        prop_assert_eq!(run_as_model_action(&rule, &mut 0), Err(expected));
    }
}
