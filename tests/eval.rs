extern crate classfile_callpoints;

mod common;

use std::rc::Rc;

use classfile_callpoints::code_attribute::{Immediate, Instruction, MethodBody};
use classfile_callpoints::constant_info::ConstPool;
use classfile_callpoints::eval::{
    ClassCatalog, ClassSpec, Eval, EvalError, HostRegistry, InvokeError, Object, Value,
};

use common::PoolBuilder;

fn body(ops: Vec<Instruction>) -> MethodBody {
    MethodBody::from_instructions(ops)
}

#[test]
fn constant_push_resolves_to_the_literal() {
    let mut pool = PoolBuilder::new();
    let queue = pool.string("queue-1");
    let pool = pool.build();
    let body = body(vec![Instruction::LoadConst(queue), Instruction::Return]);
    let catalog = ClassCatalog::new();
    let registry = HostRegistry::new();
    let eval = Eval::new(Value::Null, &body, &pool, &catalog, &registry);

    let resolved = eval.eval(0).unwrap();
    assert_eq!(resolved.value.as_str(), Some("queue-1"));
    assert_eq!(resolved.origin, 0);
    assert_eq!(resolved.first, 0);
}

#[test]
fn immediate_push_resolves_to_the_literal() {
    let pool = ConstPool::default();
    let body = body(vec![Instruction::PushImmediate(Immediate::Int(-2))]);
    let catalog = ClassCatalog::new();
    let registry = HostRegistry::new();
    let eval = Eval::new(Value::Null, &body, &pool, &catalog, &registry);

    let resolved = eval.eval(0).unwrap();
    assert!(matches!(resolved.value, Value::Int(-2)));
}

#[test]
fn receiver_slot_returns_self_identically() {
    let this = Object::new("com.example.OrderService").into_ref();
    let pool = ConstPool::default();
    // padding ahead of the load; length must not matter
    let body = body(vec![
        Instruction::Other { opcode: 0x00 },
        Instruction::Other { opcode: 0x00 },
        Instruction::LoadLocal(0),
    ]);
    let catalog = ClassCatalog::new();
    let registry = HostRegistry::new();
    let eval = Eval::new(
        Value::Object(Rc::clone(&this)),
        &body,
        &pool,
        &catalog,
        &registry,
    );

    let resolved = eval.eval(2).unwrap();
    let object = resolved.value.as_object().expect("an object");
    assert!(Rc::ptr_eq(object, &this));
}

#[test]
fn load_after_store_round_trips() {
    let mut pool = PoolBuilder::new();
    let dest = pool.string("orders.out");
    let pool = pool.build();
    let body = body(vec![
        Instruction::LoadConst(dest),
        Instruction::StoreLocal(2),
        Instruction::LoadLocal(2),
    ]);
    let catalog = ClassCatalog::new();
    let registry = HostRegistry::new();
    let eval = Eval::new(Value::Null, &body, &pool, &catalog, &registry);

    // eval(Store(v); Load) == eval(v)
    let via_load = eval.eval(2).unwrap();
    let direct = eval.eval(0).unwrap();
    assert_eq!(via_load.value.as_str(), direct.value.as_str());
    assert_eq!(via_load.origin, 2);
}

#[test]
fn nearest_preceding_store_wins() {
    let mut pool = PoolBuilder::new();
    let first = pool.string("first");
    let second = pool.string("second");
    let pool = pool.build();
    let body = body(vec![
        Instruction::LoadConst(first),
        Instruction::StoreLocal(1),
        Instruction::LoadConst(second),
        Instruction::StoreLocal(1),
        Instruction::LoadLocal(1),
    ]);
    let catalog = ClassCatalog::new();
    let registry = HostRegistry::new();
    let eval = Eval::new(Value::Null, &body, &pool, &catalog, &registry);

    assert_eq!(eval.eval(4).unwrap().value.as_str(), Some("second"));
}

#[test]
fn load_without_store_is_unresolved() {
    let pool = ConstPool::default();
    let body = body(vec![
        Instruction::Other { opcode: 0x00 },
        Instruction::LoadLocal(3),
    ]);
    let catalog = ClassCatalog::new();
    let registry = HostRegistry::new();
    let eval = Eval::new(Value::Null, &body, &pool, &catalog, &registry);

    match eval.eval(1) {
        Err(EvalError::UnresolvedLocal { slot: 3, .. }) => {}
        other => panic!("expected UnresolvedLocal, got {other:?}"),
    }
}

fn service_catalog() -> ClassCatalog {
    let mut catalog = ClassCatalog::new();
    catalog.register(
        "com.example.OrderService",
        ClassSpec::extends("com.example.BaseService").field("client"),
    );
    catalog.register("com.example.BaseService", ClassSpec::default().field("endpoint"));
    catalog.register("com.example.Client", ClassSpec::default().field("target"));
    catalog
}

#[test]
fn field_chain_resolves_through_the_receiver() {
    let mut pool = PoolBuilder::new();
    let client_ref = pool.field_ref(
        "com/example/OrderService",
        "client",
        "Lcom/example/Client;",
    );
    let target_ref = pool.field_ref("com/example/Client", "target", "Ljava/lang/String;");
    let pool = pool.build();

    let this = Object::new("com.example.OrderService")
        .field(
            "client",
            Value::object(Object::new("com.example.Client").field("target", Value::string("queue-7"))),
        )
        .into_ref();

    let body = body(vec![
        Instruction::LoadLocal(0),
        Instruction::GetField(client_ref),
        Instruction::GetField(target_ref),
    ]);
    let catalog = service_catalog();
    let registry = HostRegistry::new();
    let eval = Eval::new(Value::Object(this), &body, &pool, &catalog, &registry);

    assert_eq!(eval.eval(2).unwrap().value.as_str(), Some("queue-7"));
}

#[test]
fn inherited_field_resolves_through_an_ancestor() {
    let mut pool = PoolBuilder::new();
    let endpoint_ref = pool.field_ref(
        "com/example/OrderService",
        "endpoint",
        "Ljava/lang/String;",
    );
    let pool = pool.build();

    let this = Object::new("com.example.OrderService")
        .field("endpoint", Value::string("amqp://broker"))
        .into_ref();
    let body = body(vec![Instruction::LoadLocal(0), Instruction::GetField(endpoint_ref)]);
    let catalog = service_catalog();
    let registry = HostRegistry::new();
    let eval = Eval::new(Value::Object(this), &body, &pool, &catalog, &registry);

    assert_eq!(eval.eval(1).unwrap().value.as_str(), Some("amqp://broker"));
}

#[test]
fn missing_field_fails_without_panicking() {
    let mut pool = PoolBuilder::new();
    let missing_ref = pool.field_ref("com/example/OrderService", "nope", "Ljava/lang/String;");
    let pool = pool.build();

    let this = Object::new("com.example.OrderService").into_ref();
    let body = body(vec![Instruction::LoadLocal(0), Instruction::GetField(missing_ref)]);
    let catalog = service_catalog();
    let registry = HostRegistry::new();
    let eval = Eval::new(Value::Object(this), &body, &pool, &catalog, &registry);

    match eval.eval(1) {
        Err(EvalError::FieldNotFound { class, field }) => {
            assert_eq!(class, "com.example.OrderService");
            assert_eq!(field, "nope");
        }
        other => panic!("expected FieldNotFound, got {other:?}"),
    }
}

#[test]
fn arguments_come_back_in_declared_order() {
    let mut pool = PoolBuilder::new();
    let x = pool.string("X");
    let y = pool.string("Y");
    let join = pool.method_ref(
        "com/example/Names",
        "join",
        "(Ljava/lang/String;Ljava/lang/String;)Ljava/lang/String;",
    );
    let pool = pool.build();
    let body = body(vec![
        Instruction::LoadConst(x),
        Instruction::LoadConst(y),
        Instruction::InvokeStatic(join),
    ]);
    let catalog = ClassCatalog::new();
    let registry = HostRegistry::new();
    let eval = Eval::new(Value::Null, &body, &pool, &catalog, &registry);

    let args = eval.eval_arguments(2, 2).unwrap();
    let values: Vec<_> = args.values.iter().map(|v| v.as_str().unwrap()).collect();
    assert_eq!(values, vec!["X", "Y"]);
    assert_eq!(args.first, 0);
}

#[test]
fn static_call_executes_through_the_registry() {
    let mut pool = PoolBuilder::new();
    let q1 = pool.string("q1");
    let wrap = pool.method_ref(
        "com/example/Destination",
        "wrap",
        "(Ljava/lang/String;)Lcom/example/Destination;",
    );
    let pool = pool.build();
    let body = body(vec![Instruction::LoadConst(q1), Instruction::InvokeStatic(wrap)]);
    let catalog = ClassCatalog::new();
    let mut registry = HostRegistry::new();
    registry.register(
        "com.example.Destination",
        "wrap",
        &["java.lang.String"],
        |args| {
            let name = args[0].as_str().ok_or("wrap expects a string")?;
            Ok(Value::object(
                Object::new("com.example.Destination").field("name", Value::string(name)),
            ))
        },
    );
    let eval = Eval::new(Value::Null, &body, &pool, &catalog, &registry);

    let resolved = eval.eval(1).unwrap();
    let destination = resolved.value.as_object().expect("a destination object");
    assert_eq!(destination.class_name(), "com.example.Destination");
    assert_eq!(
        destination.field_value("name").and_then(|v| v.as_str()),
        Some("q1")
    );
    assert_eq!(resolved.first, 0);
}

#[test]
fn nested_static_calls_chain_the_argument_walks() {
    let mut pool = PoolBuilder::new();
    let x = pool.string("x");
    let y = pool.string("y");
    let trim = pool.method_ref(
        "com/example/Names",
        "trim",
        "(Ljava/lang/String;)Ljava/lang/String;",
    );
    let join = pool.method_ref(
        "com/example/Names",
        "join",
        "(Ljava/lang/String;Ljava/lang/String;)Ljava/lang/String;",
    );
    let pool = pool.build();
    // join(trim("x"), "y")
    let body = body(vec![
        Instruction::LoadConst(x),
        Instruction::InvokeStatic(trim),
        Instruction::LoadConst(y),
        Instruction::InvokeStatic(join),
    ]);
    let catalog = ClassCatalog::new();
    let mut registry = HostRegistry::new();
    registry.register("com.example.Names", "trim", &["java.lang.String"], |args| {
        Ok(Value::string(format!("trim({})", args[0])))
    });
    registry.register(
        "com.example.Names",
        "join",
        &["java.lang.String", "java.lang.String"],
        |args| Ok(Value::string(format!("{},{}", args[0], args[1]))),
    );
    let eval = Eval::new(Value::Null, &body, &pool, &catalog, &registry);

    let resolved = eval.eval(3).unwrap();
    assert_eq!(resolved.value.as_str(), Some("trim(x),y"));
    // the outer walk consumed everything back to the first constant
    assert_eq!(resolved.first, 0);
}

#[test]
fn unknown_owner_surfaces_as_invoke_error() {
    let mut pool = PoolBuilder::new();
    let q = pool.string("q");
    let wrap = pool.method_ref(
        "com/example/Missing",
        "wrap",
        "(Ljava/lang/String;)Lcom/example/Missing;",
    );
    let pool = pool.build();
    let body = body(vec![Instruction::LoadConst(q), Instruction::InvokeStatic(wrap)]);
    let catalog = ClassCatalog::new();
    let registry = HostRegistry::new();
    let eval = Eval::new(Value::Null, &body, &pool, &catalog, &registry);

    match eval.eval(1) {
        Err(EvalError::Invoke(InvokeError::UnknownOwner(owner))) => {
            assert_eq!(owner, "com.example.Missing");
        }
        other => panic!("expected UnknownOwner, got {other:?}"),
    }
}

#[test]
fn host_failure_keeps_the_original_message() {
    let mut pool = PoolBuilder::new();
    let q = pool.string("not-a-number");
    let parse = pool.method_ref("com/example/Ports", "parse", "(Ljava/lang/String;)I");
    let pool = pool.build();
    let body = body(vec![Instruction::LoadConst(q), Instruction::InvokeStatic(parse)]);
    let catalog = ClassCatalog::new();
    let mut registry = HostRegistry::new();
    registry.register("com.example.Ports", "parse", &["java.lang.String"], |_| {
        Err("bad port".to_string())
    });
    let eval = Eval::new(Value::Null, &body, &pool, &catalog, &registry);

    match eval.eval(1) {
        Err(EvalError::Invoke(InvokeError::Failed { message, .. })) => {
            assert_eq!(message, "bad port");
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[test]
fn registry_distinguishes_lookup_failures() {
    use classfile_callpoints::descriptor::TypeDesc;
    use classfile_callpoints::eval::StaticInvoker;

    let mut registry = HostRegistry::new();
    registry.register("com.example.Ports", "parse", &["java.lang.String"], |_| {
        Ok(Value::Int(80))
    });
    let string_arg = [TypeDesc::Class("java/lang/String".into())];
    let int_arg = [TypeDesc::Int];

    match registry.invoke_static("com.example.Ports", "render", &string_arg, &[Value::Null]) {
        Err(InvokeError::MethodNotFound { name, .. }) => assert_eq!(name, "render"),
        other => panic!("expected MethodNotFound, got {other:?}"),
    }
    match registry.invoke_static("com.example.Ports", "parse", &int_arg, &[Value::Int(1)]) {
        Err(InvokeError::SignatureMismatch { signature, .. }) => assert_eq!(signature, "int"),
        other => panic!("expected SignatureMismatch, got {other:?}"),
    }
    match registry.invoke_static("com.example.Ports", "parse", &string_arg, &[]) {
        Err(InvokeError::ArityMismatch {
            declared: 1,
            resolved: 0,
            ..
        }) => {}
        other => panic!("expected ArityMismatch, got {other:?}"),
    }
}

#[test]
fn unsupported_instruction_is_loud_but_typed() {
    let pool = ConstPool::default();
    // iadd: outside the supported opcode set
    let body = body(vec![Instruction::Other { opcode: 0x60 }]);
    let catalog = ClassCatalog::new();
    let registry = HostRegistry::new();
    let eval = Eval::new(Value::Null, &body, &pool, &catalog, &registry);

    let err = eval.eval(0).unwrap_err();
    assert!(err.is_unsupported());
}

#[test]
fn checkcast_is_transparent() {
    let mut pool = PoolBuilder::new();
    let s = pool.string("through");
    let pool = pool.build();
    let body = body(vec![
        Instruction::LoadConst(s),
        Instruction::CheckCast(1),
        Instruction::StoreLocal(1),
        Instruction::LoadLocal(1),
    ]);
    let catalog = ClassCatalog::new();
    let registry = HostRegistry::new();
    let eval = Eval::new(Value::Null, &body, &pool, &catalog, &registry);

    assert_eq!(eval.eval(3).unwrap().value.as_str(), Some("through"));
}

#[test]
fn step_limit_fails_deterministically() {
    let mut pool = PoolBuilder::new();
    let s = pool.string("v");
    let pool = pool.build();
    let body = body(vec![
        Instruction::LoadConst(s),
        Instruction::StoreLocal(1),
        Instruction::LoadLocal(1),
    ]);
    let catalog = ClassCatalog::new();
    let registry = HostRegistry::new();
    let eval =
        Eval::new(Value::Null, &body, &pool, &catalog, &registry).with_step_limit(1);

    match eval.eval(2) {
        Err(EvalError::StepLimit { limit: 1 }) => {}
        other => panic!("expected StepLimit, got {other:?}"),
    }
}

#[test]
fn eval_return_resolves_the_returned_expression() {
    let mut pool = PoolBuilder::new();
    let s = pool.string("result");
    let pool = pool.build();
    let body = body(vec![Instruction::LoadConst(s), Instruction::Return]);
    let catalog = ClassCatalog::new();
    let registry = HostRegistry::new();
    let eval = Eval::new(Value::Null, &body, &pool, &catalog, &registry);

    assert_eq!(eval.eval_return().unwrap().value.as_str(), Some("result"));
}
