use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::callable::{Callable, LoxFunction};
use crate::value::Value;

/// A class value: its methods plus an optional superclass.
pub struct LoxClass {
    pub name: String,
    methods: HashMap<String, Rc<LoxFunction>>,
    superclass: Option<Rc<LoxClass>>,
}

impl LoxClass {
    pub fn new(
        name: String,
        superclass: Option<Rc<LoxClass>>,
        methods: HashMap<String, Rc<LoxFunction>>,
    ) -> Self {
        Self {
            name,
            methods,
            superclass,
        }
    }

    /// Look `name` up on this class, then up the superclass chain.
    pub fn find_method(&self, name: &str) -> Option<Rc<LoxFunction>> {
        match self.methods.get(name) {
            Some(method) => Some(Rc::clone(method)),
            None => self
                .superclass
                .as_ref()
                .and_then(|superclass| superclass.find_method(name)),
        }
    }

    /// Calling a class takes whatever its (possibly inherited) `init` takes.
    pub fn arity(&self) -> usize {
        self.find_method("init").map_or(0, |init| init.arity())
    }
}

/// An object created by calling a class.
pub struct LoxInstance {
    class: Rc<LoxClass>,
    fields: HashMap<String, Value>,
}

impl LoxInstance {
    pub fn new(class: Rc<LoxClass>) -> Self {
        Self {
            class,
            fields: HashMap::new(),
        }
    }

    pub fn class(&self) -> &Rc<LoxClass> {
        &self.class
    }

    pub fn field(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }

    /// Fields may shadow methods; no check against the method table.
    pub fn set(&mut self, name: &str, value: Value) {
        self.fields.insert(name.to_string(), value);
    }
}

/// Property read: own fields first, then a method bound to `instance`.
/// `None` means the property does not exist.
pub fn get_property(instance: &Rc<RefCell<LoxInstance>>, name: &str) -> Option<Value> {
    if let Some(value) = instance.borrow().field(name) {
        return Some(value);
    }

    let method: Rc<LoxFunction> = instance.borrow().class.find_method(name)?;

    let bound: LoxFunction = method.bind(Rc::clone(instance));

    Some(Value::Callable(Callable::Function(Rc::new(bound))))
}
