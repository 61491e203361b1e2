//! Script runtime management
//!
//! Provides the JavaScript runtime entity scripts run in. Every context gets,
//! in order:
//!
//! 1. `__native`: one function per [`NativeCallTable`] entry. Getters return
//!    `[x, y, z]`, setters take `(handle, x, y, z)`.
//! 2. the prelude: `Entity`, `Vector3`, `registerEntity`, `print`, `console`.
//!
//! Scripts define classes extending `Entity` and register them by name:
//!
//! ```js
//! class Spinner extends Entity {
//!     onUpdate(dt) {
//!         const r = this.rotation;
//!         this.rotation = new Vector3(r.x, r.y + 90 * dt, r.z);
//!     }
//! }
//! registerEntity("Spinner", Spinner);
//! ```

use crate::behaviour::{EntityContext, LifecycleHook, ScriptBehaviour};
use crate::bridge::{BridgeError, NativeCall, NativeCallTable, TransformBridge};
use crate::error::ScriptError;
use crate::ffi::ScriptHandle;
use latch_core::ecs::EntityId;
use latch_core::glam::Vec3;
use rquickjs::{CatchResultExt, Context, Ctx, Exception, FromJs, Function, Object, Runtime};
use std::path::Path;

const PRELUDE: &str = include_str!("prelude.js");

/// Script execution context
pub struct ScriptRuntime {
    pub context: Context,
    #[allow(dead_code)] // Kept alive for context lifetime
    runtime: Runtime,
    bridge: TransformBridge,
    calls: NativeCallTable,
    sources: Vec<(String, String)>,
}

impl ScriptRuntime {
    /// Runtime exposing the six transform calls.
    pub fn new(bridge: TransformBridge) -> Result<Self, ScriptError> {
        Self::with_calls(bridge, NativeCallTable::transform())
    }

    pub fn with_calls(bridge: TransformBridge, calls: NativeCallTable) -> Result<Self, ScriptError> {
        let (runtime, context) = create_context(&bridge, &calls)?;
        tracing::info!(native_calls = calls.len(), "Script runtime initialized");

        Ok(Self {
            context,
            runtime,
            bridge,
            calls,
            sources: Vec::new(),
        })
    }

    pub fn bridge(&self) -> &TransformBridge {
        &self.bridge
    }

    /// Evaluate source without remembering it for reloads.
    pub fn execute(&self, source: &str) -> Result<(), ScriptError> {
        self.context.with(|ctx| evaluate(&ctx, "<inline>", source))
    }

    /// Evaluate an expression and convert its value.
    pub fn eval<V>(&self, source: &str) -> Result<V, ScriptError>
    where
        V: for<'js> FromJs<'js>,
    {
        self.context.with(|ctx| {
            ctx.eval::<V, _>(source)
                .catch(&ctx)
                .map_err(|e| exception("<eval>", e))
        })
    }

    /// Evaluate a named script and remember it so [`reload`](Self::reload) replays it.
    pub fn load_source(&mut self, name: &str, source: &str) -> Result<(), ScriptError> {
        self.context.with(|ctx| evaluate(&ctx, name, source))?;
        self.sources.push((name.to_string(), source.to_string()));
        tracing::info!(script = name, "Script loaded");
        Ok(())
    }

    pub fn load_file(&mut self, path: &Path) -> Result<(), ScriptError> {
        let source = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_source(&path.display().to_string(), &source)
    }

    /// Throw the context away and replay every loaded script into a fresh one.
    ///
    /// Instances created before the reload keep talking to the old context;
    /// callers recreate them after this returns.
    pub fn reload(&mut self) -> Result<(), ScriptError> {
        tracing::info!(scripts = self.sources.len(), "Reloading scripts");

        let (runtime, context) = create_context(&self.bridge, &self.calls)?;
        self.context = context;
        self.runtime = runtime;

        for (name, source) in &self.sources {
            self.context.with(|ctx| evaluate(&ctx, name, source))?;
        }
        Ok(())
    }

    pub fn class_exists(&self, class_name: &str) -> Result<bool, ScriptError> {
        self.context.with(|ctx| -> Result<bool, ScriptError> {
            let latch: Object = ctx.globals().get("__latch")?;
            let has_class: Function = latch.get("hasClass")?;
            Ok(has_class.call((class_name,))?)
        })
    }

    /// Registered class names, in registration order.
    pub fn class_names(&self) -> Result<Vec<String>, ScriptError> {
        self.context.with(|ctx| -> Result<Vec<String>, ScriptError> {
            let latch: Object = ctx.globals().get("__latch")?;
            let class_names: Function = latch.get("classNames")?;
            Ok(class_names.call(())?)
        })
    }

    /// Construct a script instance for `entity`. The handle is passed to the
    /// constructor and stays fixed for the instance's lifetime. `OnCreate` is
    /// not called here; attach the result to a [`crate::ScriptHost`].
    pub fn instantiate(&self, class_name: &str, entity: EntityId) -> Result<JsBehaviour, ScriptError> {
        if !self.class_exists(class_name)? {
            return Err(ScriptError::UnknownClass(class_name.to_string()));
        }
        let handle = ScriptHandle::from(entity)
            .to_js_number()
            .ok_or(BridgeError::InvalidHandle(entity.id()))?;

        let token = self.context.with(|ctx| -> Result<f64, ScriptError> {
            let latch: Object = ctx.globals().get("__latch")?;
            let instantiate: Function = latch.get("instantiate")?;
            instantiate
                .call::<_, f64>((class_name, handle))
                .catch(&ctx)
                .map_err(|e| exception(&format!("{class_name} constructor"), e))
        })?;

        Ok(JsBehaviour {
            context: self.context.clone(),
            class_name: class_name.to_string(),
            token,
            released: false,
        })
    }

    /// Number of JS instances currently alive in this context.
    pub fn instance_count(&self) -> Result<usize, ScriptError> {
        self.context.with(|ctx| -> Result<usize, ScriptError> {
            let latch: Object = ctx.globals().get("__latch")?;
            let instance_count: Function = latch.get("instanceCount")?;
            let count: f64 = instance_count.call(())?;
            Ok(count as usize)
        })
    }
}

/// A JavaScript `Entity` instance driven through the lifecycle hooks.
///
/// Transform access from script goes through the runtime's own bridge, which
/// shares the world with the host. The JS instance is released after
/// `OnDestroy`, or when the behaviour is dropped without being destroyed.
pub struct JsBehaviour {
    context: Context,
    class_name: String,
    token: f64,
    released: bool,
}

impl JsBehaviour {
    fn invoke(&self, hook: LifecycleHook, dt: f32) -> Result<(), ScriptError> {
        self.context.with(|ctx| -> Result<(), ScriptError> {
            let latch: Object = ctx.globals().get("__latch")?;
            let invoke: Function = latch.get("invoke")?;
            invoke
                .call::<_, ()>((self.token, hook.js_method(), f64::from(dt)))
                .catch(&ctx)
                .map_err(|e| exception(&format!("{}.{}", self.class_name, hook.js_method()), e))
        })
    }

    fn release(&mut self) -> Result<(), ScriptError> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.context.with(|ctx| -> Result<(), ScriptError> {
            let latch: Object = ctx.globals().get("__latch")?;
            let release: Function = latch.get("release")?;
            Ok(release.call::<_, ()>((self.token,))?)
        })
    }
}

impl Drop for JsBehaviour {
    fn drop(&mut self) {
        if let Err(error) = self.release() {
            tracing::warn!(class = %self.class_name, %error, "Failed to release script instance");
        }
    }
}

impl ScriptBehaviour for JsBehaviour {
    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn on_create(&mut self, _ctx: &mut EntityContext<'_>) -> Result<(), ScriptError> {
        self.invoke(LifecycleHook::Create, 0.0)
    }

    fn on_start(&mut self, _ctx: &mut EntityContext<'_>) -> Result<(), ScriptError> {
        self.invoke(LifecycleHook::Start, 0.0)
    }

    fn on_update(&mut self, _ctx: &mut EntityContext<'_>, dt: f32) -> Result<(), ScriptError> {
        self.invoke(LifecycleHook::Update, dt)
    }

    fn on_destroy(&mut self, _ctx: &mut EntityContext<'_>) -> Result<(), ScriptError> {
        let result = self.invoke(LifecycleHook::Destroy, 0.0);
        self.release()?;
        result
    }
}

fn create_context(
    bridge: &TransformBridge,
    calls: &NativeCallTable,
) -> Result<(Runtime, Context), ScriptError> {
    let runtime = Runtime::new()?;
    let context = Context::full(&runtime)?;

    context.with(|ctx| -> Result<(), ScriptError> {
        install_log(&ctx)?;
        install_native_calls(&ctx, bridge, calls)?;
        evaluate(&ctx, "prelude", PRELUDE)
    })?;

    Ok((runtime, context))
}

fn evaluate(ctx: &Ctx<'_>, name: &str, source: &str) -> Result<(), ScriptError> {
    ctx.eval::<(), _>(source)
        .catch(ctx)
        .map_err(|e| exception(name, e))
}

fn exception(context: &str, error: impl std::fmt::Display) -> ScriptError {
    ScriptError::Exception {
        context: context.to_string(),
        message: error.to_string(),
    }
}

fn install_log<'js>(ctx: &Ctx<'js>) -> rquickjs::Result<()> {
    let log = Function::new(ctx.clone(), |level: String, message: String| {
        match level.as_str() {
            "error" => tracing::error!(target: "latch_script::js", "{message}"),
            "warn" => tracing::warn!(target: "latch_script::js", "{message}"),
            "debug" => tracing::debug!(target: "latch_script::js", "{message}"),
            _ => tracing::info!(target: "latch_script::js", "{message}"),
        }
    })?;
    ctx.globals().set("__log", log)
}

fn install_native_calls<'js>(
    ctx: &Ctx<'js>,
    bridge: &TransformBridge,
    calls: &NativeCallTable,
) -> rquickjs::Result<()> {
    let native = Object::new(ctx.clone())?;

    for (name, call) in calls.iter() {
        let bridge = bridge.clone();
        let function = match call {
            NativeCall::Get(get) => Function::new(
                ctx.clone(),
                move |ctx: Ctx<'js>, handle: f64| -> rquickjs::Result<Vec<f64>> {
                    let v = get(&bridge, ScriptHandle::from_js_number(handle))
                        .map_err(|e| throw(&ctx, name, e))?;
                    Ok(vec![f64::from(v.x), f64::from(v.y), f64::from(v.z)])
                },
            )?,
            NativeCall::Set(set) => Function::new(
                ctx.clone(),
                move |ctx: Ctx<'js>, handle: f64, x: f64, y: f64, z: f64| -> rquickjs::Result<()> {
                    let v = Vec3::new(x as f32, y as f32, z as f32);
                    set(&bridge, ScriptHandle::from_js_number(handle), v)
                        .map_err(|e| throw(&ctx, name, e))
                },
            )?,
        };
        native.set(name, function)?;
    }

    ctx.globals().set("__native", native)
}

fn throw(ctx: &Ctx<'_>, call: &str, error: BridgeError) -> rquickjs::Error {
    Exception::throw_message(ctx, &format!("{call}: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::InvalidHandlePolicy;
    use crate::host::ScriptHost;
    use latch_core::ecs::{EntityRecord, World};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn runtime(policy: InvalidHandlePolicy) -> ScriptRuntime {
        let world = Rc::new(RefCell::new(World::new()));
        ScriptRuntime::new(TransformBridge::new(world, policy)).unwrap()
    }

    fn spawn(runtime: &ScriptRuntime, id: u64) -> EntityId {
        runtime
            .bridge()
            .world()
            .borrow_mut()
            .spawn_with_id(EntityId::from_raw(id), EntityRecord::default())
            .unwrap()
    }

    const RECORDER: &str = r#"
        var calls = [];
        class Recorder extends Entity {
            onCreate() { calls.push("create:" + this.handle); }
            onStart() { calls.push("start:" + this.handle); }
            onUpdate(dt) { calls.push("update:" + this.handle + ":" + dt); }
            onDestroy() { calls.push("destroy:" + this.handle); }
        }
        registerEntity("Recorder", Recorder);
    "#;

    #[test]
    fn vector_constants_are_exact() {
        let rt = runtime(InvalidHandlePolicy::Fail);
        let zero: Vec<f64> = rt.eval("const z = Vector3.Zero; [z.x, z.y, z.z]").unwrap();
        let one: Vec<f64> = rt.eval("const o = Vector3.One; [o.x, o.y, o.z]").unwrap();
        assert_eq!(zero, vec![0.0, 0.0, 0.0]);
        assert_eq!(one, vec![1.0, 1.0, 1.0]);

        // Each access is a fresh value, never an alias.
        let aliased: bool = rt.eval("const a = Vector3.One; a.x = 5; Vector3.One.x === 5").unwrap();
        assert!(!aliased);
    }

    #[test]
    fn native_table_is_installed_and_frozen() {
        let rt = runtime(InvalidHandlePolicy::Fail);
        let names: Vec<String> = rt.eval("Object.keys(__native).sort()").unwrap();
        assert_eq!(
            names,
            ["GetPosition", "GetRotation", "GetScale", "SetPosition", "SetRotation", "SetScale"]
        );
        let frozen: bool = rt.eval("Object.isFrozen(__native)").unwrap();
        assert!(frozen);
    }

    #[test]
    fn static_calls_round_trip_through_the_world() {
        let rt = runtime(InvalidHandlePolicy::Fail);
        let e = spawn(&rt, 42);

        rt.execute("Entity.SetPosition(42, new Vector3(1, 2, 3));").unwrap();
        let p: Vec<f64> = rt.eval("const p = Entity.GetPosition(42); [p.x, p.y, p.z]").unwrap();
        assert_eq!(p, vec![1.0, 2.0, 3.0]);
        assert_eq!(
            rt.bridge().get_position(e.into()).unwrap(),
            Vec3::new(1.0, 2.0, 3.0)
        );
    }

    #[test]
    fn fractional_values_survive_the_boundary() {
        let rt = runtime(InvalidHandlePolicy::Fail);
        let e = spawn(&rt, 1);
        let v = Vec3::new(0.1, -2.7, 1.0e-3);
        rt.bridge().set_scale(e.into(), v).unwrap();

        rt.execute("const s = Entity.GetScale(1); Entity.SetScale(1, s);").unwrap();
        assert_eq!(rt.bridge().get_scale(e.into()).unwrap(), v);
    }

    #[test]
    fn invalid_handle_throws_under_fail_policy() {
        let rt = runtime(InvalidHandlePolicy::Fail);
        let messages: Vec<String> = rt
            .eval(
                r#"
                const out = [];
                const attempts = [
                    () => Entity.GetPosition(9), () => Entity.SetPosition(9, Vector3.One),
                    () => Entity.GetRotation(9), () => Entity.SetRotation(9, Vector3.One),
                    () => Entity.GetScale(9), () => Entity.SetScale(9, Vector3.One),
                ];
                for (const attempt of attempts) {
                    try { attempt(); out.push("ok"); } catch (e) { out.push(e.message); }
                }
                out
            "#,
            )
            .unwrap();

        assert_eq!(messages.len(), 6);
        for message in &messages {
            assert!(message.contains("invalid entity handle 9"), "{message}");
        }
    }

    #[test]
    fn invalid_handle_defaults_under_fallback_policy() {
        let rt = runtime(InvalidHandlePolicy::Fallback);
        let values: Vec<f64> = rt
            .eval(
                r#"
                Entity.SetPosition(9, Vector3.One);
                Entity.SetRotation(9, Vector3.One);
                Entity.SetScale(9, Vector3.One);
                const p = Entity.GetPosition(9), r = Entity.GetRotation(9), s = Entity.GetScale(9);
                [p.x, p.y, p.z, r.x, r.y, r.z, s.x, s.y, s.z]
            "#,
            )
            .unwrap();
        assert_eq!(values, vec![0.0; 9]);
    }

    #[test]
    fn non_integral_handles_are_invalid() {
        let rt = runtime(InvalidHandlePolicy::Fail);
        spawn(&rt, 1);
        let threw: bool = rt
            .eval("try { Entity.GetPosition(1.5); false } catch (e) { true }")
            .unwrap();
        assert!(threw);
    }

    #[test]
    fn register_entity_rejects_non_entities() {
        let rt = runtime(InvalidHandlePolicy::Fail);
        let err = rt
            .execute("class Plain {} registerEntity('Plain', Plain);")
            .unwrap_err();
        match err {
            ScriptError::Exception { message, .. } => {
                assert!(message.contains("does not extend Entity"), "{message}")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!rt.class_exists("Plain").unwrap());
    }

    #[test]
    fn class_registry_lists_registered_classes() {
        let mut rt = runtime(InvalidHandlePolicy::Fail);
        rt.load_source("classes.js", r#"
            class A extends Entity {}
            class B extends A {}
            registerEntity("A", A);
            registerEntity("B", B);
        "#)
        .unwrap();

        assert_eq!(rt.class_names().unwrap(), ["A", "B"]);
        assert!(rt.class_exists("B").unwrap());
        assert!(!rt.class_exists("C").unwrap());
    }

    #[test]
    fn instantiate_unknown_class_fails() {
        let rt = runtime(InvalidHandlePolicy::Fail);
        let e = spawn(&rt, 1);
        assert!(matches!(
            rt.instantiate("Ghost", e),
            Err(ScriptError::UnknownClass(name)) if name == "Ghost"
        ));
    }

    #[test]
    fn handle_is_read_only() {
        let mut rt = runtime(InvalidHandlePolicy::Fail);
        rt.load_source("sneaky.js", r#"
            var outcome = "";
            class Sneaky extends Entity {
                onCreate() {
                    try { this.handle = 1234; outcome = "reassigned"; }
                    catch (e) { outcome = e.name + ":" + this.handle; }
                }
            }
            registerEntity("Sneaky", Sneaky);
        "#)
        .unwrap();

        let e = spawn(&rt, 8);
        let mut host = ScriptHost::new(rt.bridge().clone());
        host.attach(e, Box::new(rt.instantiate("Sneaky", e).unwrap())).unwrap();

        let outcome: String = rt.eval("outcome").unwrap();
        assert_eq!(outcome, "TypeError:8");
    }

    #[test]
    fn js_lifecycle_runs_in_order() {
        let mut rt = runtime(InvalidHandlePolicy::Fail);
        rt.load_source("recorder.js", RECORDER).unwrap();
        let e = spawn(&rt, 3);

        let mut host = ScriptHost::new(rt.bridge().clone());
        host.attach(e, Box::new(rt.instantiate("Recorder", e).unwrap())).unwrap();
        host.update(0.5).unwrap();
        host.update(0.25).unwrap();
        host.destroy(e).unwrap();

        let calls: Vec<String> = rt.eval("calls").unwrap();
        assert_eq!(
            calls,
            ["create:3", "start:3", "update:3:0.5", "update:3:0.25", "destroy:3"]
        );
        assert!(host.take_failures().is_empty());
    }

    #[test]
    fn js_scripts_move_their_entity() {
        let mut rt = runtime(InvalidHandlePolicy::Fail);
        rt.load_source("spinner.js", r#"
            class Spinner extends Entity {
                onStart() { this.position = new Vector3(1, 2, 3); }
                onUpdate(dt) {
                    const r = this.rotation;
                    this.rotation = new Vector3(r.x, r.y + 90 * dt, r.z);
                    this.scale = Vector3.One;
                }
            }
            registerEntity("Spinner", Spinner);
        "#)
        .unwrap();

        let a = spawn(&rt, 1);
        let b = spawn(&rt, 2);
        let mut host = ScriptHost::new(rt.bridge().clone());
        host.attach(a, Box::new(rt.instantiate("Spinner", a).unwrap())).unwrap();

        host.update(0.5).unwrap();
        host.update(0.5).unwrap();

        let bridge = rt.bridge();
        assert_eq!(bridge.get_position(a.into()).unwrap(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(bridge.get_rotation(a.into()).unwrap(), Vec3::new(0.0, 90.0, 0.0));
        assert_eq!(bridge.get_rotation(b.into()).unwrap(), Vec3::ZERO);
    }

    #[test]
    fn stale_handle_use_is_a_hook_failure() {
        let mut rt = runtime(InvalidHandlePolicy::Fail);
        rt.load_source("stale.js", r#"
            class Stale extends Entity {
                onUpdate() { Entity.GetPosition(this.handle + 100); }
            }
            registerEntity("Stale", Stale);
        "#)
        .unwrap();

        let e = spawn(&rt, 1);
        let mut host = ScriptHost::new(rt.bridge().clone());
        host.attach(e, Box::new(rt.instantiate("Stale", e).unwrap())).unwrap();

        let report = host.update(0.016).unwrap();
        assert_eq!(report.failed, 1);

        let failures = host.take_failures();
        assert_eq!(failures[0].class_name, "Stale");
        assert_eq!(failures[0].hook, LifecycleHook::Update);
        match &failures[0].error {
            ScriptError::Exception { context, message } => {
                assert_eq!(context, "Stale.onUpdate");
                assert!(message.contains("invalid entity handle 101"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn destroyed_instances_are_released() {
        let mut rt = runtime(InvalidHandlePolicy::Fail);
        rt.load_source("recorder.js", RECORDER).unwrap();
        let e = spawn(&rt, 4);

        let mut host = ScriptHost::new(rt.bridge().clone());
        host.attach(e, Box::new(rt.instantiate("Recorder", e).unwrap())).unwrap();
        assert_eq!(rt.instance_count().unwrap(), 1);

        host.destroy(e).unwrap();
        assert_eq!(rt.instance_count().unwrap(), 0);
    }

    #[test]
    fn dropped_behaviours_release_their_instance() {
        let mut rt = runtime(InvalidHandlePolicy::Fail);
        rt.load_source("recorder.js", RECORDER).unwrap();
        let e = spawn(&rt, 4);

        let behaviour = rt.instantiate("Recorder", e).unwrap();
        assert_eq!(rt.instance_count().unwrap(), 1);
        drop(behaviour);
        assert_eq!(rt.instance_count().unwrap(), 0);
    }

    #[test]
    fn second_instance_for_an_attached_entity_leaves_the_first_alone() {
        let mut rt = runtime(InvalidHandlePolicy::Fail);
        rt.load_source("counted.js", r#"
            var log = [];
            var created = 0;
            class Counted extends Entity {
                constructor(handle) { super(handle); this.serial = ++created; this.ready = false; }
                onCreate() { this.ready = true; log.push("create#" + this.serial); }
                onUpdate() {
                    log.push("update#" + this.serial + (this.ready ? "" : "(never created)"));
                }
            }
            registerEntity("Counted", Counted);
        "#)
        .unwrap();
        let e = spawn(&rt, 1);

        let mut host = ScriptHost::new(rt.bridge().clone());
        host.attach(e, Box::new(rt.instantiate("Counted", e).unwrap())).unwrap();

        let extra = rt.instantiate("Counted", e).unwrap();
        assert!(matches!(
            host.attach(e, Box::new(extra)),
            Err(ScriptError::AlreadyAttached(id)) if id == e
        ));
        assert_eq!(rt.instance_count().unwrap(), 1);

        host.update(0.1).unwrap();
        assert!(host.take_failures().is_empty());
        let log: Vec<String> = rt.eval("log").unwrap();
        assert_eq!(log, ["create#1", "update#1"]);
    }

    #[test]
    fn reload_replays_sources_into_a_fresh_context() {
        let mut rt = runtime(InvalidHandlePolicy::Fail);
        rt.load_source("recorder.js", RECORDER).unwrap();
        rt.execute("var scratch = 1;").unwrap();

        rt.reload().unwrap();

        assert!(rt.class_exists("Recorder").unwrap());
        let scratch: bool = rt.eval("typeof scratch === 'undefined'").unwrap();
        assert!(scratch);
        let calls: Vec<String> = rt.eval("calls").unwrap();
        assert!(calls.is_empty());
    }

    #[test]
    fn load_file_reports_missing_files() {
        let mut rt = runtime(InvalidHandlePolicy::Fail);
        let err = rt.load_file(Path::new("/definitely/not/here.js")).unwrap_err();
        assert!(matches!(err, ScriptError::Io { .. }));
    }

    #[test]
    fn syntax_errors_name_the_script() {
        let mut rt = runtime(InvalidHandlePolicy::Fail);
        match rt.load_source("broken.js", "class {").unwrap_err() {
            ScriptError::Exception { context, .. } => assert_eq!(context, "broken.js"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
