//! Node-shape predicates shared by rules and the traversal driver.
//!
//! Every accessor returns `None` for absent or differently-shaped children,
//! so malformed-but-parseable trees never match.

use tree_sitter::Node;

/// Logging object whose `log` calls are debug statements.
pub const DEBUG_OBJECT: &str = "console";
/// Method on `DEBUG_OBJECT` treated as a debug statement.
pub const DEBUG_METHOD: &str = "log";
/// Method whose return value is a subscription handle.
pub const SUBSCRIBE_METHOD: &str = "subscribe";
/// Lifecycle hook that receives cleanup callbacks.
pub const CLEANUP_HOOK: &str = "onDestroy";

/// 1-based start line of a node.
pub fn line_of(node: Node) -> usize {
    node.start_position().row + 1
}

pub fn is_call(node: Node) -> bool {
    node.kind() == "call_expression"
}

/// The callee of a call expression.
pub fn callee(call: Node) -> Option<Node> {
    if !is_call(call) {
        return None;
    }
    call.child_by_field_name("function")
}

/// Text of an `identifier` node.
pub fn identifier_name<'s>(node: Node, source: &'s [u8]) -> Option<&'s str> {
    if node.kind() != "identifier" {
        return None;
    }
    node.utf8_text(source).ok()
}

/// Name of a bare-identifier callee (`handle()`).
pub fn callee_identifier<'s>(call: Node, source: &'s [u8]) -> Option<&'s str> {
    callee(call).and_then(|c| identifier_name(c, source))
}

/// Object and property names of a member-access callee (`object.property(...)`).
///
/// The object name is `None` when the base is not a plain identifier
/// (`a.b.log()`, `this.log()`).
pub fn member_callee<'s>(call: Node, source: &'s [u8]) -> Option<(Option<&'s str>, &'s str)> {
    let member = callee(call)?;
    if member.kind() != "member_expression" {
        return None;
    }
    let property = member.child_by_field_name("property")?;
    if property.kind() != "property_identifier" {
        return None;
    }
    let property = property.utf8_text(source).ok()?;
    let object = member
        .child_by_field_name("object")
        .and_then(|o| identifier_name(o, source));
    Some((object, property))
}

/// `anything.subscribe(...)`, matched on the property name alone.
pub fn is_subscribe_call(node: Node, source: &[u8]) -> bool {
    matches!(member_callee(node, source), Some((_, SUBSCRIBE_METHOD)))
}

/// First argument of a call, skipping comments.
pub fn first_argument(call: Node) -> Option<Node> {
    let args = call.child_by_field_name("arguments")?;
    let mut cursor = args.walk();
    let first = args
        .named_children(&mut cursor)
        .find(|arg| !arg.is_extra());
    first
}

/// The nearest ancestor starting at `parent` that is not a parenthesized
/// expression, so `const h = (x.subscribe(f))` still binds `h`.
pub fn binding_parent(parent: Option<Node<'_>>) -> Option<Node<'_>> {
    let mut parent = parent;
    while let Some(p) = parent.filter(|p| p.kind() == "parenthesized_expression") {
        parent = p.parent();
    }
    parent
}

/// Whether `parent` binds the value of its child to a name.
pub fn is_binding(parent: Option<Node>) -> bool {
    matches!(
        parent.map(|p| p.kind()),
        Some("variable_declarator") | Some("assignment_expression")
    )
}

/// The plain identifier a declarator or assignment binds to.
///
/// Destructuring patterns and member targets yield `None`.
pub fn bound_name<'s>(parent: Node, source: &'s [u8]) -> Option<&'s str> {
    let target = match parent.kind() {
        "variable_declarator" => parent.child_by_field_name("name")?,
        "assignment_expression" => parent.child_by_field_name("left")?,
        _ => return None,
    };
    identifier_name(target, source)
}
