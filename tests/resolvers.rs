use std::sync::Arc;

use formulary::{
    CompileError, Compiler, ErrorKind, Features, RuntimeError, Value, ValueType,
    resolver::{
        CompositeResolver, FunctionSignature, Members, ObjectResolver, Reflect, Resolver,
        ResolverOptions, StaticLibrary, UnknownMember,
    },
};
use parking_lot::Mutex;

struct Inventory {
    gold:  i64,
    items: Vec<String>,
}

impl Reflect for Inventory {
    fn members(members: &mut Members<Self>) {
        members.property("gold", |i: &Self| i.gold);
        members.function("count",
                         FunctionSignature::new([ValueType::String], ValueType::Integer),
                         |i: &Self, args: &[Value]| {
                             let wanted = args[0].as_str()?;
                             let found = i.items.iter().filter(|item| *item == wanted).count();
                             Ok(Value::Integer(i64::try_from(found).unwrap_or(i64::MAX)))
                         });
    }
}

struct Player {
    name:      String,
    health:    i64,
    secret:    i64,
    inventory: Arc<dyn Resolver>,
}

impl Reflect for Player {
    fn members(members: &mut Members<Self>) {
        members.property("name", |p: &Self| p.name.clone());
        members.property("health", |p: &Self| p.health);
        members.property("secret", |p: &Self| p.secret).private();
        members.property("inventory", |p: &Self| Arc::clone(&p.inventory));
        members.static_property("max_health", || 100_i64);
        members.function("heal",
                         FunctionSignature::new([ValueType::Integer], ValueType::Integer),
                         |p: &Self, args: &[Value]| {
                             Ok(Value::Integer((p.health + args[0].as_integer()?).min(100)))
                         });
        members.static_function("sum",
                                FunctionSignature::new([], ValueType::Float)
                                    .variadic(ValueType::Float),
                                |args: &[Value]| {
                                    let total = args[0].as_array()?
                                                       .iter()
                                                       .map(Value::as_float)
                                                       .sum::<Result<f64, _>>()?;
                                    Ok(Value::Float(total))
                                });
        members.static_function("scale",
                                FunctionSignature::new([ValueType::Float], ValueType::Array)
                                    .variadic(ValueType::Float),
                                |args: &[Value]| {
                                    let factor = args[0].as_float()?;
                                    let scaled = args[1].as_array()?
                                                        .iter()
                                                        .map(|v| Ok(Value::Float(v.as_float()? * factor)))
                                                        .collect::<Result<Vec<_>, RuntimeError>>()?;
                                    Ok(Value::from(scaled))
                                });
        members.static_function("fail",
                                FunctionSignature::new([], ValueType::Integer),
                                |_: &[Value]| {
                                    Err(RuntimeError::HostFailure { function: "fail".to_string(),
                                                                    message:  "refused".to_string(), })
                                });
    }
}

fn player() -> Player {
    let inventory = Inventory { gold:  25,
                                items: vec!["potion".into(), "potion".into(), "sword".into()], };
    Player { name:      "Ayla".to_string(),
             health:    70,
             secret:    7,
             inventory: Arc::new(ObjectResolver::new(inventory)), }
}

fn resolver() -> Arc<dyn Resolver> {
    Arc::new(ObjectResolver::new(player()))
}

/// A resolver over fixed names, typed `Dynamic` throughout.
struct Fixed(Vec<(&'static str, Value)>);

impl Resolver for Fixed {
    fn try_call(&self, _name: &str, _args: &[Value]) -> Result<Option<Value>, RuntimeError> {
        Ok(None)
    }

    fn try_read(&self, name: &str) -> Result<Option<Value>, RuntimeError> {
        Ok(self.0
               .iter()
               .find(|(known, _)| *known == name)
               .map(|(_, value)| value.clone()))
    }
}

fn run<R: formulary::FromValue>(expression: &str, resolver: Arc<dyn Resolver>) -> R {
    Compiler::default().compile::<(), R>(expression, &[], Some(resolver))
                       .unwrap_or_else(|e| panic!("{expression:?} failed to compile: {e}"))
                       .call(())
                       .unwrap_or_else(|e| panic!("{expression:?} failed: {e}"))
}

#[test]
fn reads_typed_properties() {
    assert_eq!(run::<i64>("health * 2", resolver()), 140);
    assert_eq!(run::<String>("name .. ' has ' .. health", resolver()), "Ayla has 70");
    assert_eq!(run::<i64>("max_health - health", resolver()), 30);
}

#[test]
fn property_types_are_checked_while_compiling() {
    let result = Compiler::default().compile::<(), bool>("name", &[], Some(resolver()));
    assert!(matches!(result, Err(CompileError::IncompatibleResult { found:    ValueType::String,
                                                                     expected: ValueType::Bool, })));

    let result = Compiler::default().compile::<(), i64>("name * 2", &[], Some(resolver()));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Grammar);
}

#[test]
fn calls_are_checked_against_signatures() {
    assert_eq!(run::<i64>("heal(20)", resolver()), 90);
    assert_eq!(run::<i64>("heal(50)", resolver()), 100);

    let result = Compiler::default().compile::<(), i64>("heal()", &[], Some(resolver()));
    assert!(matches!(result,
                     Err(CompileError::ArgumentCountMismatch { ref function, found: 0, .. })
                     if function == "heal"));

    let result = Compiler::default().compile::<(), i64>("heal('a lot')", &[], Some(resolver()));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Grammar);
}

#[test]
fn arguments_are_converted_to_declared_types() {
    assert_eq!(run::<i64>("heal(2.0)", resolver()), 72);

    let compiled = Compiler::default().compile::<(), i64>("heal(2.5)", &[], Some(resolver()))
                                      .unwrap();
    let error = compiled.call(()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Conversion);
}

#[test]
fn variadic_arguments_are_packed() {
    assert_eq!(run::<f64>("sum()", resolver()), 0.0);
    assert_eq!(run::<f64>("sum(1, 2.5, 3)", resolver()), 6.5);

    let scaled = run::<Vec<Value>>("scale(2, 1, 2)", resolver());
    assert_eq!(scaled, vec![Value::Float(2.0), Value::Float(4.0)]);

    let result = Compiler::default().compile::<(), Vec<Value>>("scale()", &[], Some(resolver()));
    assert!(matches!(result,
                     Err(CompileError::ArgumentCountMismatch { ref expected, .. })
                     if expected == "at least 1"));
}

#[test]
fn a_single_array_passes_through_the_variadic_tail() {
    let resolver = resolver();
    let items = Value::from(vec![Value::Float(1.0), Value::Float(2.0)]);

    assert_eq!(resolver.call("sum", &[items]).unwrap(), Value::Float(3.0));
    assert_eq!(resolver.call("sum", &[]).unwrap(), Value::Float(0.0));
    assert!(matches!(resolver.call("scale", &[]),
                     Err(RuntimeError::ArgumentCountMismatch { .. })));
}

#[test]
fn private_members_need_permission() {
    let hidden = resolver();
    assert_eq!(hidden.try_read("secret").unwrap(), None);

    let compiled = Compiler::default().compile::<(), i64>("secret", &[], Some(hidden))
                                      .unwrap();
    assert!(matches!(compiled.call(()), Err(RuntimeError::PropertyNotFound { .. })));

    let options = ResolverOptions { allow_private: true,
                                    ..ResolverOptions::default() };
    let open: Arc<dyn Resolver> = Arc::new(ObjectResolver::with_options(Arc::new(player()), options));
    assert_eq!(run::<i64>("secret + 1", open), 8);
}

#[test]
fn case_insensitive_lookup() {
    let options = ResolverOptions { case_insensitive: true,
                                    ..ResolverOptions::default() };
    let relaxed: Arc<dyn Resolver> =
        Arc::new(ObjectResolver::with_options(Arc::new(player()), options));
    assert_eq!(run::<i64>("HEALTH + Heal(0)", relaxed), 140);

    let strict = resolver();
    assert_eq!(strict.try_read("HEALTH").unwrap(), None);
}

#[test]
fn static_library_exposes_static_members_only() {
    let library: Arc<dyn Resolver> = Arc::new(StaticLibrary::<Player>::new());

    assert_eq!(run::<f64>("sum(max_health, 1)", Arc::clone(&library)), 101.0);
    assert_eq!(library.try_read("health").unwrap(), None);
    assert_eq!(library.try_call("heal", &[Value::Integer(1)]).unwrap(), None);
    assert_eq!(library.function_signature("heal"), None);
}

#[test]
fn host_failures_are_reported_and_do_not_poison() {
    let compiled = Compiler::default().compile::<(bool,), i64>("if_ok(flag)", &["flag"], None);
    assert!(matches!(compiled, Err(CompileError::MissingResolver { .. })));

    let compiled = Compiler::default().compile::<(), i64>("fail()", &[], Some(resolver()))
                                      .unwrap();
    let error = compiled.call(()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Host);
    assert_eq!(error.to_string(), "function 'fail' failed: refused");

    let healthy = Compiler::default().compile::<(), i64>("health", &[], Some(resolver()))
                                     .unwrap();
    assert!(compiled.call(()).is_err());
    assert_eq!(healthy.call(()).unwrap(), 70);
}

#[test]
fn parameters_shadow_resolver_members() {
    let compiled =
        Compiler::default().compile::<(i64,), i64>("health + max_health", &["health"], Some(resolver()))
                           .unwrap();
    assert_eq!(compiled.call((1,)).unwrap(), 101);
}

#[test]
fn member_paths_walk_nested_resolvers() {
    assert_eq!(run::<i64>("inventory.gold + 1", resolver()), 26);
    assert_eq!(run::<i64>("inventory.count('potion')", resolver()), 2);
    assert_eq!(run::<i64>("inventory.count('shield')", resolver()), 0);

    let compiled = Compiler::default().compile::<(), i64>("inventory.silver", &[], Some(resolver()))
                                      .unwrap();
    assert!(matches!(compiled.call(()), Err(RuntimeError::PropertyNotFound { .. })));

    let result = Compiler::default().compile::<(), i64>("health.value", &[], Some(resolver()));
    assert!(matches!(result, Err(CompileError::InvalidOperand { ref operator, found: ValueType::Integer })
                             if operator == "."));
}

#[test]
fn member_paths_start_at_parameters() {
    let compiled =
        Compiler::default().compile::<(Arc<dyn Resolver>, i64), i64>("p.inventory.gold * n + p.heal(n)",
                                                                      &["p", "n"],
                                                                      None)
                           .unwrap();
    assert_eq!(compiled.call((resolver(), 2)).unwrap(), 50 + 72);
}

#[test]
fn path_identifiers_are_flat_names() {
    let flat: Arc<dyn Resolver> =
        Arc::new(Fixed(vec![("player.health", Value::Integer(5)), ("player", Value::Integer(1))]));
    let compiler = Compiler::new(Features::COMMON_PATH_IDENTIFIER).unwrap();

    let compiled = compiler.compile::<(), i64>("player.health * 2 + player", &[], Some(flat))
                           .unwrap();
    assert_eq!(compiled.call(()).unwrap(), 11);
}

#[test]
fn dynamic_values_are_checked_at_runtime() {
    let fixed: Arc<dyn Resolver> = Arc::new(Fixed(vec![("mood", Value::from("grumpy")),
                                                       ("level", Value::Integer(3)),
                                                       ("ratio", Value::Float(0.5))]));

    assert_eq!(run::<i64>("level * 2", Arc::clone(&fixed)), 6);
    assert_eq!(run::<f64>("level * ratio", Arc::clone(&fixed)), 1.5);
    assert_eq!(run::<i64>("-level", Arc::clone(&fixed)), -3);
    assert_eq!(run::<Value>("level / 2", Arc::clone(&fixed)), Value::Integer(1));

    let compiled = Compiler::default().compile::<(), i64>("mood + 1", &[], Some(Arc::clone(&fixed)))
                                      .unwrap();
    let error = compiled.call(()).unwrap_err();
    assert!(matches!(error, RuntimeError::InvalidOperands { .. }));
    assert_eq!(error.kind(), ErrorKind::Conversion);

    let compiled = Compiler::default().compile::<(), i64>("mood", &[], Some(fixed)).unwrap();
    assert_eq!(compiled.call(()).unwrap_err().kind(), ErrorKind::Conversion);
}

#[test]
fn composite_prefers_earlier_members() {
    let first = resolver();
    let second: Arc<dyn Resolver> = Arc::new(Fixed(vec![("health", Value::Integer(1)),
                                                        ("mana", Value::Integer(9))]));

    let composite = Arc::new(CompositeResolver::from_members([Arc::clone(&first),
                                                              Arc::clone(&second)]));
    let shared: Arc<dyn Resolver> = composite.clone();
    let compiled = Compiler::default().compile::<(), i64>("health + mana", &[], Some(shared))
                                      .unwrap();
    assert_eq!(compiled.call(()).unwrap(), 79);

    composite.add_first(Arc::clone(&second));
    assert_eq!(composite.len(), 2);
    assert_eq!(compiled.call(()).unwrap(), 10);

    assert!(composite.remove(&second));
    assert!(!composite.remove(&second));
    assert!(matches!(compiled.call(()), Err(RuntimeError::PropertyNotFound { .. })));
}

#[test]
fn composite_relative_insertion() {
    let a = resolver();
    let b: Arc<dyn Resolver> = Arc::new(Fixed(vec![("tag", Value::from("b"))]));
    let c: Arc<dyn Resolver> = Arc::new(Fixed(vec![("tag", Value::from("c"))]));
    let stranger: Arc<dyn Resolver> = Arc::new(Fixed(vec![]));

    let composite = CompositeResolver::new();
    assert!(composite.is_empty());
    composite.add(Arc::clone(&a));
    composite.add(Arc::clone(&b));

    composite.add_before(&b, Arc::clone(&c)).unwrap();
    assert_eq!(composite.read("tag").unwrap(), Value::from("c"));

    composite.add_after(&b, Arc::clone(&c)).unwrap();
    assert_eq!(composite.len(), 3);
    assert_eq!(composite.read("tag").unwrap(), Value::from("b"));

    assert_eq!(composite.add_before(&stranger, Arc::clone(&c)), Err(UnknownMember));
    assert_eq!(composite.add_after(&stranger, Arc::clone(&c)), Err(UnknownMember));
    assert!(!composite.contains(&stranger));
    assert_eq!(composite.len(), 3);

    composite.add(Arc::clone(&a));
    assert_eq!(composite.len(), 3);

    composite.clear();
    assert!(composite.is_empty());
    assert!(matches!(composite.read("tag"), Err(RuntimeError::PropertyNotFound { .. })));
}

#[test]
fn composite_types_follow_the_answering_member() {
    let typed = resolver();
    let untyped: Arc<dyn Resolver> = Arc::new(Fixed(vec![("health", Value::Integer(1))]));
    let composite = CompositeResolver::from_members([untyped, typed]);

    assert_eq!(composite.property_type("health"), ValueType::Dynamic);
    assert_eq!(composite.function_return_type("heal"), ValueType::Dynamic);
    assert_eq!(composite.function_signature("heal"), None);

    let first: Arc<dyn Resolver> = Arc::new(Fixed(vec![("p", Value::Integer(1))]));
    let second: Arc<dyn Resolver> = Arc::new(Fixed(vec![("p", Value::from("two"))]));
    let composite = Arc::new(CompositeResolver::from_members([Arc::clone(&first), second]));
    let shared: Arc<dyn Resolver> = composite.clone();
    let compiled = Compiler::default().compile::<(), Value>("p", &[], Some(shared)).unwrap();

    assert_eq!(compiled.call(()).unwrap(), Value::Integer(1));
    assert!(composite.remove(&first));
    assert_eq!(compiled.call(()).unwrap(), Value::from("two"));
}

#[test]
fn composite_members_check_their_own_arguments() {
    let composite: Arc<dyn Resolver> = Arc::new(CompositeResolver::from_members([resolver()]));
    let compile = |expression: &str| {
        Compiler::default().compile::<(), Value>(expression, &[], Some(Arc::clone(&composite)))
                           .unwrap()
    };

    assert!(matches!(compile("heal(2.5)").call(()),
                     Err(RuntimeError::ConversionFailed { .. })));
    assert_eq!(compile("heal(20) + sum(1, 2)").call(()).unwrap(), Value::Float(93.0));
    assert_eq!(compile("heal()").call(()).unwrap_err().kind(), ErrorKind::Resolution);
}

/// Records the order in which functions are called.
struct Recorder(Mutex<Vec<String>>);

impl Resolver for Recorder {
    fn try_call(&self, name: &str, args: &[Value]) -> Result<Option<Value>, RuntimeError> {
        self.0.lock().push(name.to_string());
        Ok(Some(Value::Integer(i64::try_from(args.len()).unwrap_or_default())))
    }

    fn try_read(&self, _name: &str) -> Result<Option<Value>, RuntimeError> {
        Ok(None)
    }
}

#[test]
fn arguments_are_evaluated_left_to_right() {
    let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
    let shared: Arc<dyn Resolver> = recorder.clone();

    let compiled = Compiler::default().compile::<(), i64>("f(g(1), h()) + k(1, 2, 3)", &[], Some(shared))
                                      .unwrap();
    assert_eq!(compiled.call(()).unwrap(), 5);
    assert_eq!(*recorder.0.lock(), vec!["g", "h", "f", "k"]);
}
