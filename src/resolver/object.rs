use std::{borrow::Cow, collections::HashMap, fmt, sync::Arc};

use once_cell::sync::OnceCell;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            convert::IntoValue,
            core::{Value, ValueType},
        },
    },
    resolver::core::{FunctionSignature, Resolver},
};

type Getter<T> = Arc<dyn Fn(&T) -> EvalResult<Value> + Send + Sync>;
type StaticGetter = Arc<dyn Fn() -> EvalResult<Value> + Send + Sync>;
type Method<T> = Arc<dyn Fn(&T, &[Value]) -> EvalResult<Value> + Send + Sync>;
type StaticMethod = Arc<dyn Fn(&[Value]) -> EvalResult<Value> + Send + Sync>;

/// Whether a member is visible to resolvers that do not allow private access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Always visible.
    #[default]
    Public,
    /// Visible only with [`ResolverOptions::allow_private`].
    Private,
}

/// Options for [`ObjectResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolverOptions {
    /// Expose members registered as [`Visibility::Private`].
    pub allow_private:    bool,
    /// Match member names ignoring ASCII case.
    pub case_insensitive: bool,
}

/// A host type whose members can be exposed to expressions.
///
/// # Example
/// ```
/// use formulary::{
///     interpreter::value::core::{Value, ValueType},
///     resolver::{FunctionSignature, Members, Reflect},
/// };
///
/// struct Player {
///     health: i64,
/// }
///
/// impl Reflect for Player {
///     fn members(members: &mut Members<Self>) {
///         members.property("health", |p: &Self| p.health);
///         members.function("heal",
///                          FunctionSignature::new([ValueType::Integer], ValueType::Integer),
///                          |p: &Self, args: &[Value]| Ok(Value::Integer(p.health + args[0].as_integer()?)));
///     }
/// }
/// ```
pub trait Reflect: Send + Sync + 'static {
    /// Registers the type's members.
    ///
    /// Called at most once per resolver; the order of registration decides
    /// which member wins when names collide.
    fn members(members: &mut Members<Self>)
        where Self: Sized;
}

/// What a registered member is and how to reach it.
enum MemberKind<T> {
    Property { ty: ValueType, get: Getter<T> },
    StaticProperty { ty: ValueType, get: StaticGetter },
    Function { signature: FunctionSignature, call: Method<T> },
    StaticFunction { signature: FunctionSignature, call: StaticMethod },
}

/// A single registered member.
pub struct Member<T> {
    name:       String,
    visibility: Visibility,
    kind:       MemberKind<T>,
}

impl<T> Member<T> {
    /// Marks the member private.
    pub const fn private(&mut self) -> &mut Self {
        self.visibility = Visibility::Private;
        self
    }

    const fn is_static(&self) -> bool {
        matches!(self.kind,
                 MemberKind::StaticProperty { .. } | MemberKind::StaticFunction { .. })
    }

    const fn is_property(&self) -> bool {
        matches!(self.kind, MemberKind::Property { .. } | MemberKind::StaticProperty { .. })
    }
}

/// The registry a [`Reflect`] type fills with its members.
pub struct Members<T> {
    entries: Vec<Member<T>>,
}

impl<T> Members<T> {
    fn new() -> Self {
        Self { entries: Vec::new() }
    }

    fn push(&mut self, name: &str, kind: MemberKind<T>) -> &mut Member<T> {
        self.entries.push(Member { name: name.to_string(),
                                   visibility: Visibility::Public,
                                   kind });
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    /// Registers an instance property read through `get`.
    pub fn property<R, F>(&mut self, name: &str, get: F) -> &mut Member<T>
        where R: IntoValue,
              F: Fn(&T) -> R + Send + Sync + 'static
    {
        self.push(name,
                  MemberKind::Property { ty:  R::VALUE_TYPE,
                                         get: Arc::new(move |target| get(target).into_value()), })
    }

    /// Registers a static property read through `get`.
    pub fn static_property<R, F>(&mut self, name: &str, get: F) -> &mut Member<T>
        where R: IntoValue,
              F: Fn() -> R + Send + Sync + 'static
    {
        self.push(name,
                  MemberKind::StaticProperty { ty:  R::VALUE_TYPE,
                                               get: Arc::new(move || get().into_value()), })
    }

    /// Registers an instance function.
    ///
    /// `call` receives its fixed arguments converted to the declared types,
    /// followed by one [`Value::Array`] holding the variadic tail if the
    /// signature has one.
    pub fn function<F>(&mut self,
                       name: &str,
                       signature: FunctionSignature,
                       call: F)
                       -> &mut Member<T>
        where F: Fn(&T, &[Value]) -> EvalResult<Value> + Send + Sync + 'static
    {
        self.push(name,
                  MemberKind::Function { signature,
                                         call: Arc::new(call) })
    }

    /// Registers a static function. See [`Members::function`].
    pub fn static_function<F>(&mut self,
                              name: &str,
                              signature: FunctionSignature,
                              call: F)
                              -> &mut Member<T>
        where F: Fn(&[Value]) -> EvalResult<Value> + Send + Sync + 'static
    {
        self.push(name,
                  MemberKind::StaticFunction { signature,
                                               call: Arc::new(call) })
    }
}

/// The per-resolver lookup tables, built once from a [`Members`] registry.
struct MemberIndex<T> {
    properties: HashMap<String, MemberKind<T>>,
    functions:  HashMap<String, MemberKind<T>>,
}

/// Exposes the members of a [`Reflect`] type to compiled expressions.
///
/// Instance members need a target object; without one only static members
/// resolve. The member index is built on first use and reused for the
/// lifetime of the resolver.
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// use formulary::{
///     compiler::Compiler,
///     resolver::{Members, ObjectResolver, Reflect, Resolver},
/// };
///
/// struct Circle {
///     radius: f64,
/// }
///
/// impl Reflect for Circle {
///     fn members(members: &mut Members<Self>) {
///         members.property("radius", |c: &Self| c.radius);
///     }
/// }
///
/// let resolver: Arc<dyn Resolver> = Arc::new(ObjectResolver::new(Circle { radius: 2.0 }));
/// let f = Compiler::default().compile::<(), f64>("radius * 2", &[], Some(resolver)).unwrap();
/// assert_eq!(f.call(()).unwrap(), 4.0);
/// ```
pub struct ObjectResolver<T: Reflect> {
    target:  Option<Arc<T>>,
    options: ResolverOptions,
    index:   OnceCell<MemberIndex<T>>,
}

impl<T: Reflect> ObjectResolver<T> {
    /// Exposes the public members of `target`.
    pub fn new(target: T) -> Self {
        Self::with_options(Arc::new(target), ResolverOptions::default())
    }

    /// Exposes the members of a shared `target` as `options` allow.
    pub fn with_options(target: Arc<T>, options: ResolverOptions) -> Self {
        Self { target: Some(target),
               options,
               index: OnceCell::new() }
    }

    /// Exposes only the static members of `T`.
    pub(crate) fn without_target(options: ResolverOptions) -> Self {
        Self { target: None,
               options,
               index: OnceCell::new() }
    }

    fn key<'a>(&self, name: &'a str) -> Cow<'a, str> {
        if self.options.case_insensitive {
            Cow::Owned(name.to_ascii_lowercase())
        } else {
            Cow::Borrowed(name)
        }
    }

    fn index(&self) -> &MemberIndex<T> {
        self.index.get_or_init(|| {
                      let mut members = Members::new();
                      T::members(&mut members);

                      let mut index = MemberIndex { properties: HashMap::new(),
                                                    functions:  HashMap::new(), };

                      for member in members.entries {
                          if member.visibility == Visibility::Private && !self.options.allow_private {
                              continue;
                          }
                          if !member.is_static() && self.target.is_none() {
                              continue;
                          }

                          let table = if member.is_property() {
                              &mut index.properties
                          } else {
                              &mut index.functions
                          };
                          let key = self.key(&member.name).into_owned();
                          table.entry(key).or_insert(member.kind);
                      }

                      log::debug!("indexed {} properties and {} functions of {}",
                                  index.properties.len(),
                                  index.functions.len(),
                                  std::any::type_name::<T>());
                      index
                  })
    }

    fn property(&self, name: &str) -> Option<&MemberKind<T>> {
        self.index().properties.get(self.key(name).as_ref())
    }

    fn function(&self, name: &str) -> Option<&MemberKind<T>> {
        self.index().functions.get(self.key(name).as_ref())
    }
}

/// Checks the argument count against `signature`, converts fixed arguments to
/// their declared types and packs the variadic tail into one array.
///
/// A call passing exactly one argument in the variadic position that is
/// already an array hands that array through unchanged.
fn bind_arguments(name: &str,
                  signature: &FunctionSignature,
                  args: &[Value])
                  -> EvalResult<Vec<Value>> {
    if !signature.accepts(args.len()) {
        return Err(RuntimeError::ArgumentCountMismatch { function: name.to_string(),
                                                         expected: signature.arity(),
                                                         found:    args.len(), });
    }

    let fixed = signature.parameters.len();
    let mut bound = Vec::with_capacity(fixed + 1);
    for (value, ty) in args.iter().zip(&signature.parameters) {
        bound.push(value.clone().convert(*ty)?);
    }

    if let Some(element) = signature.rest {
        let tail = &args[fixed..];
        if let [single @ Value::Array(_)] = tail {
            bound.push(single.clone());
        } else {
            let packed = tail.iter()
                             .map(|value| value.clone().convert(element))
                             .collect::<EvalResult<Vec<_>>>()?;
            bound.push(Value::Array(packed.into()));
        }
    }

    Ok(bound)
}

impl<T: Reflect> Resolver for ObjectResolver<T> {
    fn try_call(&self, name: &str, args: &[Value]) -> EvalResult<Option<Value>> {
        let result = match self.function(name) {
            Some(MemberKind::Function { signature, call }) => {
                let Some(target) = &self.target else {
                    return Ok(None);
                };
                let bound = bind_arguments(name, signature, args)?;
                call(&**target, &bound)?.convert(signature.returns)?
            },
            Some(MemberKind::StaticFunction { signature, call }) => {
                let bound = bind_arguments(name, signature, args)?;
                call(&bound)?.convert(signature.returns)?
            },
            _ => return Ok(None),
        };

        Ok(Some(result))
    }

    fn try_read(&self, name: &str) -> EvalResult<Option<Value>> {
        match self.property(name) {
            Some(MemberKind::Property { get, .. }) => match &self.target {
                Some(target) => get(&**target).map(Some),
                None => Ok(None),
            },
            Some(MemberKind::StaticProperty { get, .. }) => get().map(Some),
            _ => Ok(None),
        }
    }

    fn function_signature(&self, name: &str) -> Option<FunctionSignature> {
        match self.function(name)? {
            MemberKind::Function { signature, .. }
            | MemberKind::StaticFunction { signature, .. } => Some(signature.clone()),
            _ => None,
        }
    }

    fn property_type(&self, name: &str) -> ValueType {
        match self.property(name) {
            Some(MemberKind::Property { ty, .. } | MemberKind::StaticProperty { ty, .. }) => *ty,
            _ => ValueType::Dynamic,
        }
    }
}

impl<T: Reflect> fmt::Debug for ObjectResolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectResolver")
         .field("type", &std::any::type_name::<T>())
         .field("has_target", &self.target.is_some())
         .field("options", &self.options)
         .finish()
    }
}
