use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use minijinja::machinery::{ast, parse};

use crate::rules::tables::RuleTables;

// ============================================================================
// Template variable extractor — AST walk with loop-alias resolution
// ============================================================================

/// What to do with call expressions (`users[0].name.full()`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallHandling {
    /// Drop the callee path; its arguments are still walked.
    Discard,
    /// Keep the callee path with a trailing `()` marker.
    Retain,
}

#[derive(Debug)]
pub enum ExtractError {
    /// The template source does not parse. Fatal, never retried.
    Parse(minijinja::Error),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::Parse(e) => write!(f, "template parse error: {}", e),
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractError::Parse(e) => Some(e),
        }
    }
}

/// Extract the set of variable paths a template references, with loop
/// aliases resolved to indexed collection paths.
///
/// `{% for child in children %}{{ child.name.first }}{% endfor %}` yields
/// `children[i].name.first`. References that already carry an explicit
/// numeric index (`clients[0].email`) are preserved verbatim.
pub fn extract_variables(
    tables: &RuleTables,
    source: &str,
    calls: CallHandling,
) -> Result<BTreeSet<String>, ExtractError> {
    run_walk(tables, source, EmitMode::All(calls))
}

/// Extract only the references wrapped in one named filter. Used to find
/// fields that appear in the final rendition only (signature lines).
/// Aliases are resolved identically to [`extract_variables`].
pub fn extract_filtered(
    tables: &RuleTables,
    source: &str,
    filter_name: &str,
) -> Result<BTreeSet<String>, ExtractError> {
    run_walk(tables, source, EmitMode::FilteredOnly(filter_name.to_string()))
}

fn run_walk(
    tables: &RuleTables,
    source: &str,
    mode: EmitMode,
) -> Result<BTreeSet<String>, ExtractError> {
    let root = parse(source, "template", Default::default(), Default::default())
        .map_err(ExtractError::Parse)?;
    let mut walker = Walker {
        tables,
        mode,
        scopes: vec![BTreeMap::new()],
        found: BTreeSet::new(),
    };
    walker.walk_stmt(&root);
    Ok(walker.found)
}

#[derive(Debug, Clone)]
enum EmitMode {
    All(CallHandling),
    FilteredOnly(String),
}

/// A reference chain split into its base identifier, an optional explicit
/// numeric index on the base, and the rendered remainder.
struct PathChain {
    base: String,
    base_index: Option<usize>,
    rest: String,
}

impl PathChain {
    fn ident(base: &str) -> Self {
        PathChain { base: base.to_string(), base_index: None, rest: String::new() }
    }
}

struct Walker<'t> {
    tables: &'t RuleTables,
    mode: EmitMode,
    /// Innermost scope last. `Some(path)` is a loop alias bound to a
    /// collection; `None` is a shadowed local that must never be emitted.
    scopes: Vec<BTreeMap<String, Option<String>>>,
    found: BTreeSet<String>,
}

impl<'t> Walker<'t> {
    // ---- statements --------------------------------------------------------

    fn walk_stmt(&mut self, node: &ast::Stmt<'_>) {
        match node {
            ast::Stmt::Template(tmpl) => {
                for child in &tmpl.children {
                    self.walk_stmt(child);
                }
            }
            ast::Stmt::EmitRaw(_) => {}
            ast::Stmt::EmitExpr(emit) => {
                self.collect_expr(&emit.expr);
            }
            ast::Stmt::IfCond(cond) => {
                self.collect_expr(&cond.expr);
                for child in &cond.true_body {
                    self.walk_stmt(child);
                }
                for child in &cond.false_body {
                    self.walk_stmt(child);
                }
            }
            ast::Stmt::ForLoop(f) => self.walk_for_loop(f),
            ast::Stmt::WithBlock(with) => {
                self.scopes.push(BTreeMap::new());
                for (target, value) in &with.assignments {
                    self.collect_expr(value);
                    self.shadow_target(target);
                }
                for child in &with.body {
                    self.walk_stmt(child);
                }
                self.scopes.pop();
            }
            ast::Stmt::Set(set) => {
                self.collect_expr(&set.expr);
                self.shadow_target(&set.target);
            }
            ast::Stmt::SetBlock(set) => {
                if let Some(filter) = &set.filter {
                    self.collect_expr(filter);
                }
                for child in &set.body {
                    self.walk_stmt(child);
                }
                self.shadow_target(&set.target);
            }
            ast::Stmt::FilterBlock(block) => {
                self.collect_expr(&block.filter);
                for child in &block.body {
                    self.walk_stmt(child);
                }
            }
            ast::Stmt::Block(block) => {
                for child in &block.body {
                    self.walk_stmt(child);
                }
            }
            ast::Stmt::Macro(m) => {
                self.scopes.push(BTreeMap::new());
                for arg in &m.args {
                    self.shadow_target(arg);
                }
                for child in &m.body {
                    self.walk_stmt(child);
                }
                self.scopes.pop();
            }
            // Unrecognized-but-valid constructs are simply not collected.
            _ => {}
        }
    }

    fn walk_for_loop(&mut self, f: &ast::ForLoop<'_>) {
        // The iterable itself is a reference to the collection.
        let collection = self.loop_collection_path(&f.iter);
        if let Some(ref path) = collection {
            self.emit(path.clone());
        } else {
            // Not a clean path; still walk it for nested references.
            self.collect_expr(&f.iter);
        }

        self.scopes.push(BTreeMap::new());
        match &f.target {
            ast::Expr::Var(var) => {
                let binding = collection.clone();
                self.scope_insert(var.id, binding);
            }
            // Tuple unpacking binds names that denote no collection
            // element; they are shadowed, never resolved.
            other => self.shadow_target(other),
        }

        if let Some(filter) = &f.filter_expr {
            self.collect_expr(filter);
        }
        for child in &f.body {
            self.walk_stmt(child);
        }
        self.scopes.pop();

        for child in &f.else_body {
            self.walk_stmt(child);
        }
    }

    /// Stringify the iterable side of a loop: strip trailing subscript,
    /// slice, filter, and call layers down to a clean base path, then
    /// resolve outer-loop aliases so nesting composes transitively.
    fn loop_collection_path(&self, iter: &ast::Expr<'_>) -> Option<String> {
        let mut expr = iter;
        loop {
            match expr {
                ast::Expr::Filter(f) => expr = f.expr.as_ref()?,
                ast::Expr::Slice(s) => expr = &s.expr,
                ast::Expr::Call(c) => {
                    // `users.complete_elements()` iterates `users`.
                    if let ast::Expr::GetAttr(attr) = &c.expr {
                        if is_iteration_helper(attr.name) {
                            expr = &attr.expr;
                            continue;
                        }
                    }
                    expr = &c.expr;
                }
                _ => break,
            }
        }
        let chain = path_chain(expr)?;
        self.resolve_chain(&chain)
    }

    // ---- expressions -------------------------------------------------------

    fn collect_expr(&mut self, expr: &ast::Expr<'_>) {
        match expr {
            ast::Expr::Var(_) | ast::Expr::GetAttr(_) | ast::Expr::GetItem(_) => {
                match path_chain(expr) {
                    Some(chain) => {
                        if let Some(path) = self.resolve_chain(&chain) {
                            self.emit(path);
                        }
                    }
                    None => {
                        // Dynamic base; walk the pieces instead.
                        match expr {
                            ast::Expr::GetAttr(a) => self.collect_expr(&a.expr),
                            ast::Expr::GetItem(g) => {
                                self.collect_expr(&g.expr);
                                self.collect_expr(&g.subscript_expr);
                            }
                            _ => {}
                        }
                    }
                }
            }
            ast::Expr::Call(call) => {
                match path_chain(&call.expr) {
                    Some(chain) => {
                        // Discard mode drops the callee path entirely.
                        if let EmitMode::All(CallHandling::Retain) = self.mode {
                            if let Some(path) = self.resolve_chain(&chain) {
                                self.emit(format!("{}()", path));
                            }
                        }
                    }
                    None => self.collect_expr(&call.expr),
                }
                for arg in &call.args {
                    self.collect_call_arg(arg);
                }
            }
            ast::Expr::Filter(filter) => {
                if let EmitMode::FilteredOnly(ref wanted) = self.mode {
                    if filter.name == wanted.as_str() {
                        if let Some(inner) = &filter.expr {
                            if let Some(chain) = path_chain(inner) {
                                if let Some(path) = self.resolve_chain(&chain) {
                                    self.found.insert(path);
                                }
                            }
                        }
                    }
                }
                if let Some(inner) = &filter.expr {
                    self.collect_expr(inner);
                }
                for arg in &filter.args {
                    self.collect_call_arg(arg);
                }
            }
            ast::Expr::Test(test) => {
                self.collect_expr(&test.expr);
                for arg in &test.args {
                    self.collect_call_arg(arg);
                }
            }
            ast::Expr::UnaryOp(op) => self.collect_expr(&op.expr),
            ast::Expr::BinOp(op) => {
                self.collect_expr(&op.left);
                self.collect_expr(&op.right);
            }
            ast::Expr::IfExpr(ifx) => {
                self.collect_expr(&ifx.test_expr);
                self.collect_expr(&ifx.true_expr);
                if let Some(false_expr) = &ifx.false_expr {
                    self.collect_expr(false_expr);
                }
            }
            ast::Expr::List(list) => {
                for item in &list.items {
                    self.collect_expr(item);
                }
            }
            ast::Expr::Slice(slice) => {
                self.collect_expr(&slice.expr);
            }
            ast::Expr::Const(_) => {}
            _ => {}
        }
    }

    fn collect_call_arg(&mut self, arg: &ast::CallArg<'_>) {
        match arg {
            ast::CallArg::Pos(expr)
            | ast::CallArg::Kwarg(_, expr)
            | ast::CallArg::PosSplat(expr)
            | ast::CallArg::KwargSplat(expr) => self.collect_expr(expr),
        }
    }

    // ---- scope handling ----------------------------------------------------

    fn scope_insert(&mut self, name: &str, binding: Option<String>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), binding);
        }
    }

    /// Mark every name bound by an assignment target as shadowed.
    fn shadow_target(&mut self, target: &ast::Expr<'_>) {
        match target {
            ast::Expr::Var(var) => self.scope_insert(var.id, None),
            ast::Expr::List(list) => {
                for item in &list.items {
                    self.shadow_target(item);
                }
            }
            _ => {}
        }
    }

    /// Innermost scope wins.
    fn lookup(&self, name: &str) -> Option<&Option<String>> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Resolve a chain against the scope stack. `None` means the
    /// reference must not be emitted (pseudo-name or shadowed local).
    fn resolve_chain(&self, chain: &PathChain) -> Option<String> {
        if self.tables.is_ignored_template_name(&chain.base) {
            return None;
        }
        match self.lookup(&chain.base) {
            Some(Some(collection)) if chain.base_index.is_none() => {
                Some(format!("{}[i]{}", collection, chain.rest))
            }
            Some(Some(_)) => {
                // Explicit numeric index bypasses alias substitution.
                Some(render_chain(chain))
            }
            Some(None) => None,
            None => Some(render_chain(chain)),
        }
    }

    fn emit(&mut self, path: String) {
        if let EmitMode::All(_) = self.mode {
            self.found.insert(path);
        }
    }
}

fn render_chain(chain: &PathChain) -> String {
    match chain.base_index {
        Some(n) => format!("{}[{}]{}", chain.base, n, chain.rest),
        None => format!("{}{}", chain.base, chain.rest),
    }
}

/// Decompose a Var/GetAttr/GetItem chain. Returns `None` when the base is
/// not a plain identifier (a literal, a call result, an arbitrary
/// expression) — those are walked piecewise instead.
fn path_chain(expr: &ast::Expr<'_>) -> Option<PathChain> {
    match expr {
        ast::Expr::Var(var) => Some(PathChain::ident(var.id)),
        ast::Expr::GetAttr(attr) => {
            let mut chain = path_chain(&attr.expr)?;
            chain.rest.push('.');
            chain.rest.push_str(attr.name);
            Some(chain)
        }
        ast::Expr::GetItem(item) => {
            let mut chain = path_chain(&item.expr)?;
            match &item.subscript_expr {
                ast::Expr::Const(c) => {
                    if let Some(key) = c.value.as_str() {
                        // A string subscript is attribute access.
                        chain.rest.push('.');
                        chain.rest.push_str(key);
                    } else if let Ok(n) = i64::try_from(c.value.clone()) {
                        if n >= 0 && chain.rest.is_empty() && chain.base_index.is_none() {
                            chain.base_index = Some(n as usize);
                        } else if n >= 0 {
                            chain.rest.push_str(&format!("[{}]", n));
                        } else {
                            return None;
                        }
                    } else {
                        return None;
                    }
                }
                // A computed subscript becomes the symbolic placeholder.
                _ => chain.rest.push_str("[i]"),
            }
            Some(chain)
        }
        _ => None,
    }
}

/// Accessor methods that iterate the collection they are called on.
fn is_iteration_helper(name: &str) -> bool {
    matches!(
        name,
        "complete_elements" | "elements" | "items" | "values" | "keys"
    )
}
