//! The asynchronous walker.
//!
//! Mirrors `eval.rs` arm for arm; the only behavioral difference is in
//! `visit`, which awaits pending values as soon as a handler produces
//! one, so every use site downstream sees settled values in source
//! order. Recursion is boxed because the future type would otherwise be
//! infinite.

use core::cell::RefCell;
use std::rc::Rc;

use ecow::EcoString;
use futures::future::LocalBoxFuture;

use super::error::EvalError;
use super::state::EvalState;
use super::{
    emit, functions, literal_value, member, merge_into, operators, parse_bigint, spread_into,
    try_value, EvalResult, Outcome,
};
use crate::api::{Context, EvalOptions};
use crate::guard::is_safe_key;
use crate::syntax::{AssignmentOperator, LogicalOperator, Node, UnaryOperator};
use crate::values::coerce;
use crate::values::{ObjectMap, Value};

pub(crate) struct AsyncEvaluator<'opts> {
    options: &'opts EvalOptions,
    state: EvalState,
}

impl<'opts> AsyncEvaluator<'opts> {
    pub fn new(options: &'opts EvalOptions) -> Self {
        Self {
            options,
            state: EvalState::new(),
        }
    }

    pub async fn run(&mut self, tree: &Node, cx: &Context) -> Result<Value, EvalError> {
        match self.visit(tree, cx, None).await? {
            Outcome::Value(value) => Ok(value),
            Outcome::Fail => Ok(Value::Undefined),
        }
    }

    fn visit<'a>(
        &'a mut self,
        node: &'a Node,
        cx: &'a Context,
        parent: Option<&'a Node>,
    ) -> LocalBoxFuture<'a, EvalResult> {
        Box::pin(async move {
            self.state.enter(self.options)?;
            let is_container = node.is_container();
            if is_container {
                self.state.push_container(node.kind());
            }
            let result = self.dispatch(node, cx, parent).await;
            if is_container {
                self.state.pop_container();
            }
            self.state.leave();
            match result? {
                _ if self.state.fail => Ok(Outcome::Fail),
                Outcome::Value(Value::Pending(pending)) => {
                    Ok(Outcome::Value(pending.wait().await))
                }
                outcome => Ok(outcome),
            }
        })
    }

    async fn dispatch(
        &mut self,
        node: &Node,
        cx: &Context,
        parent: Option<&Node>,
    ) -> EvalResult {
        if let Some(visitor) = self.options.visitors.get(&node.kind()) {
            return emit(visitor(node, cx)?);
        }
        match node {
            Node::NumericLiteral { value } => emit(Value::Number(*value)),
            Node::StringLiteral { value } => emit(Value::Str(value.clone())),
            Node::BooleanLiteral { value } => emit(Value::Bool(*value)),
            Node::NullLiteral => emit(Value::Null),
            Node::BigIntLiteral { value } => emit(parse_bigint(value)?),
            Node::RegExpLiteral { pattern, flags } => emit(Value::regex(pattern, flags)?),
            Node::Literal { value, regex } => emit(literal_value(value, regex)?),
            Node::TemplateElement { value, .. } => emit(Value::Str(
                value.cooked.clone().unwrap_or_else(|| value.raw.clone()),
            )),

            Node::Identifier { name } => {
                let shorthand = matches!(
                    parent,
                    Some(Node::ObjectProperty {
                        shorthand: true,
                        ..
                    })
                );
                member::resolve_identifier(name, cx, shorthand, &mut self.state, self.options)
            }
            Node::ThisExpression => emit(cx.get("this").unwrap_or_default()),

            Node::TemplateLiteral {
                quasis,
                expressions,
            } => {
                let mut out = EcoString::new();
                for (i, quasi) in quasis.iter().enumerate() {
                    if let Node::TemplateElement { value, .. } = quasi {
                        out.push_str(value.cooked.as_deref().unwrap_or(&value.raw));
                    }
                    if let Some(expr) = expressions.get(i) {
                        let value = try_value!(self.visit(expr, cx, Some(node)).await);
                        out.push_str(&coerce::to_string(&value));
                    }
                }
                emit(Value::Str(out))
            }

            Node::ArrayExpression { elements } => {
                let mut out: Vec<Value> = Vec::with_capacity(elements.len());
                for element in elements {
                    let Some(element) = element else {
                        self.state.check_growth(out.len(), 1, self.options)?;
                        out.push(Value::Undefined);
                        continue;
                    };
                    if let Node::SpreadElement { argument } = element {
                        let spread = try_value!(self.visit(argument, cx, Some(node)).await);
                        spread_into(&mut out, &spread, &self.state, self.options)?;
                        continue;
                    }
                    let value = try_value!(self.visit(element, cx, Some(node)).await);
                    self.state.check_growth(out.len(), 1, self.options)?;
                    out.push(value);
                }
                emit(Value::array(out))
            }
            Node::ObjectExpression { properties } => {
                let mut map = ObjectMap::new();
                for property in properties {
                    match property {
                        Node::SpreadElement { argument } => {
                            let spread =
                                try_value!(self.visit(argument, cx, Some(property)).await);
                            merge_into(&mut map, &spread);
                        }
                        Node::ObjectProperty {
                            key,
                            value,
                            computed,
                            ..
                        } => {
                            let name = if *computed {
                                let key_value =
                                    try_value!(self.visit(key, cx, Some(property)).await);
                                coerce::to_property_key(&key_value)
                            } else {
                                static_property_name(key)?
                            };
                            let value =
                                try_value!(self.visit(value, cx, Some(property)).await);
                            map.insert(name, value);
                        }
                        other => return Err(EvalError::unsupported(other.kind())),
                    }
                }
                emit(Value::Object(Rc::new(RefCell::new(map))))
            }

            Node::MemberExpression {
                object,
                property,
                computed,
                optional,
            } => {
                self.member(node, object, property, *computed, *optional, cx)
                    .await
            }
            Node::OptionalMemberExpression {
                object,
                property,
                computed,
            } => self.member(node, object, property, *computed, true, cx).await,

            Node::BinaryExpression {
                operator,
                left,
                right,
            } => {
                let left = try_value!(self.visit(left, cx, Some(node)).await);
                let right = try_value!(self.visit(right, cx, Some(node)).await);
                emit(operators::binary(
                    *operator,
                    &left,
                    &right,
                    self.options.strict_explicit(),
                )?)
            }
            Node::LogicalExpression {
                operator,
                left,
                right,
            } => {
                let left = try_value!(self.visit(left, cx, Some(node)).await);
                let decided = match operator {
                    LogicalOperator::And => !left.truthy(),
                    LogicalOperator::Or => left.truthy(),
                    LogicalOperator::NullishCoalescing => !left.is_nullish(),
                };
                let result = if decided {
                    left
                } else {
                    try_value!(self.visit(right, cx, Some(node)).await)
                };
                if self.options.boolean_logical_operators {
                    emit(Value::Bool(result.truthy()))
                } else {
                    emit(result)
                }
            }
            Node::UnaryExpression {
                operator: UnaryOperator::Delete,
                argument,
            } => self.delete(argument, cx).await,
            Node::UnaryExpression { operator, argument } => {
                let value = try_value!(self.visit(argument, cx, Some(node)).await);
                emit(operators::unary(*operator, &value)?)
            }
            Node::UpdateExpression {
                operator,
                argument,
                prefix,
            } => {
                let current = try_value!(self.visit(argument, cx, Some(node)).await);
                let (store, result) = operators::update(*operator, *prefix, &current)?;
                if let Node::Identifier { name } = &**argument {
                    cx.set(name.clone(), store);
                }
                emit(result)
            }
            Node::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                let test = try_value!(self.visit(test, cx, Some(node)).await);
                if test.truthy() {
                    self.visit(consequent, cx, Some(node)).await
                } else {
                    self.visit(alternate, cx, Some(node)).await
                }
            }
            Node::SequenceExpression { expressions } => {
                let mut result = Outcome::Value(Value::Undefined);
                for expr in expressions {
                    result = self.visit(expr, cx, Some(node)).await?;
                }
                Ok(result)
            }
            Node::AssignmentExpression {
                operator,
                left,
                right,
            } => {
                if self.options.regex_operator && *operator == AssignmentOperator::Assign {
                    if let Node::UnaryExpression {
                        operator: UnaryOperator::BitNot,
                        argument,
                    } = &**right
                    {
                        let subject = try_value!(self.visit(left, cx, Some(node)).await);
                        let regex = try_value!(self.visit(argument, cx, Some(node)).await);
                        if let Value::Regex(re) = &regex {
                            return emit(Value::Bool(
                                re.is_match(&coerce::to_string(&subject)),
                            ));
                        }
                    }
                }
                Err(EvalError::assignment_not_supported(*operator))
            }

            Node::CallExpression {
                callee,
                arguments,
                optional,
            } => self.call(node, callee, arguments, *optional, cx).await,
            Node::OptionalCallExpression { callee, arguments } => {
                self.call(node, callee, arguments, true, cx).await
            }
            Node::NewExpression { callee, arguments } => {
                self.call(node, callee, arguments, false, cx).await
            }
            Node::FunctionExpression { params, body }
            | Node::ArrowFunctionExpression { params, body } => {
                self.function_literal(node, params, body, cx).await
            }
            Node::TaggedTemplateExpression { tag, quasi } => {
                self.tagged_template(node, tag, quasi, cx).await
            }
            Node::AwaitExpression { argument } => {
                if !self.options.functions {
                    return Err(EvalError::unsupported(node.kind()));
                }
                // `visit` already settles pending values.
                self.visit(argument, cx, Some(node)).await
            }
            Node::ReturnStatement { argument } => {
                if !self.options.functions {
                    return Err(EvalError::unsupported(node.kind()));
                }
                match argument {
                    Some(argument) => self.visit(argument, cx, Some(node)).await,
                    None => emit(Value::Undefined),
                }
            }
            Node::ExpressionStatement { expression } => {
                if !self.options.functions {
                    return Err(EvalError::unsupported(node.kind()));
                }
                self.visit(expression, cx, Some(node)).await
            }
            Node::BlockStatement { body } => {
                if !self.options.functions {
                    return Err(EvalError::unsupported(node.kind()));
                }
                let mut results = Vec::with_capacity(body.len());
                for stmt in body {
                    results.push(try_value!(self.visit(stmt, cx, Some(node)).await));
                }
                emit(Value::array(results))
            }

            Node::ObjectProperty { .. } | Node::SpreadElement { .. } => {
                Err(EvalError::unsupported(node.kind()))
            }
        }
    }

    async fn member(
        &mut self,
        node: &Node,
        object: &Node,
        property: &Node,
        computed: bool,
        optional: bool,
        cx: &Context,
    ) -> EvalResult {
        let obj = try_value!(self.visit(object, cx, Some(node)).await);
        if optional && obj.is_nullish() {
            return emit(Value::Undefined);
        }
        let outcome = if let Some(key) = member::static_key(property, computed, self.options) {
            member::resolve_static(&obj, &key, &mut self.state, self.options)?
        } else {
            let key_value = try_value!(self.visit(property, cx, Some(node)).await);
            member::resolve_computed(&obj, &key_value, &mut self.state, self.options)?
        };
        match outcome {
            Outcome::Value(result) => emit(member::bind_if_function(result, &obj, self.options)),
            Outcome::Fail => Ok(Outcome::Fail),
        }
    }

    async fn delete(&mut self, target: &Node, cx: &Context) -> EvalResult {
        let (object, property, computed) = match target {
            Node::MemberExpression {
                object,
                property,
                computed,
                ..
            } => (object, property, *computed),
            Node::OptionalMemberExpression {
                object,
                property,
                computed,
            } => (object, property, *computed),
            _ => return emit(Value::Bool(false)),
        };
        let obj = try_value!(self.visit(object, cx, Some(target)).await);
        let key = if let Some(key) = member::static_key(property, computed, self.options) {
            key
        } else {
            let key_value = try_value!(self.visit(property, cx, Some(target)).await);
            coerce::to_property_key(&key_value)
        };
        if !is_safe_key(&key) {
            self.state.fail = true;
            return Ok(Outcome::Fail);
        }
        match obj {
            Value::Object(map) => {
                map.borrow_mut().remove(key.as_str());
                emit(Value::Bool(true))
            }
            _ => emit(Value::Bool(false)),
        }
    }

    async fn call(
        &mut self,
        node: &Node,
        callee: &Node,
        arguments: &[Node],
        optional: bool,
        cx: &Context,
    ) -> EvalResult {
        if !self.options.functions {
            return Err(EvalError::functions_not_supported());
        }
        let callee_value = try_value!(self.visit(callee, cx, Some(node)).await);
        if optional && callee_value.is_nullish() {
            return emit(Value::Undefined);
        }
        let Value::Function(fun) = &callee_value else {
            self.state.fail = true;
            return Ok(Outcome::Fail);
        };
        let mut args: Vec<Value> = Vec::with_capacity(arguments.len());
        for argument in arguments {
            if let Node::SpreadElement { argument: inner } = argument {
                let spread = try_value!(self.visit(inner, cx, Some(node)).await);
                spread_into(&mut args, &spread, &self.state, self.options)?;
            } else {
                let value = try_value!(self.visit(argument, cx, Some(node)).await);
                self.state.check_growth(args.len(), 1, self.options)?;
                args.push(value);
            }
        }
        if self.state.no_execute {
            return emit(Value::Undefined);
        }
        // A pending result settles in `visit` like any other value.
        emit(fun.call(None, &args)?)
    }

    async fn function_literal(
        &mut self,
        node: &Node,
        params: &[Node],
        body: &Node,
        cx: &Context,
    ) -> EvalResult {
        if !self.options.functions {
            return Err(EvalError::unsupported(node.kind()));
        }
        let Some(names) = functions::param_names(params) else {
            self.state.fail = true;
            return Ok(Outcome::Fail);
        };
        let scope = functions::params_scope(cx, &names);
        let outer_no_execute = self.state.no_execute;
        self.state.no_execute = true;
        let validated = self.validate_body(body, &scope).await;
        self.state.no_execute = outer_no_execute;
        try_value!(validated);
        if outer_no_execute {
            return emit(Value::Undefined);
        }
        match &self.options.compile {
            Some(compile) => emit(compile(node, &cx.entries())?),
            None => Err(functions::missing_compile_error()),
        }
    }

    async fn validate_body(&mut self, body: &Node, scope: &Context) -> EvalResult {
        match body {
            Node::BlockStatement { body: statements } => {
                for stmt in statements {
                    try_value!(self.visit(stmt, scope, Some(body)).await);
                }
                emit(Value::Undefined)
            }
            expression => {
                try_value!(self.visit(expression, scope, None).await);
                emit(Value::Undefined)
            }
        }
    }

    async fn tagged_template(
        &mut self,
        node: &Node,
        tag: &Node,
        quasi: &Node,
        cx: &Context,
    ) -> EvalResult {
        if !self.options.functions {
            return Err(EvalError::unsupported(node.kind()));
        }
        let tag_value = try_value!(self.visit(tag, cx, Some(node)).await);
        let Value::Function(fun) = &tag_value else {
            self.state.fail = true;
            return Ok(Outcome::Fail);
        };
        let Node::TemplateLiteral {
            quasis,
            expressions,
        } = quasi
        else {
            return Err(EvalError::unsupported(quasi.kind()));
        };
        let mut args = vec![functions::cooked_strings(quasis)];
        for expr in expressions {
            args.push(try_value!(self.visit(expr, cx, Some(node)).await));
        }
        if self.state.no_execute {
            return emit(Value::Undefined);
        }
        emit(fun.call(None, &args)?)
    }
}

fn static_property_name(key: &Node) -> Result<EcoString, EvalError> {
    match key {
        Node::Identifier { name } => Ok(name.clone()),
        Node::StringLiteral { value } => Ok(value.clone()),
        Node::NumericLiteral { value } => Ok(coerce::format_number(*value)),
        other => Err(EvalError::unsupported(other.kind())),
    }
}
