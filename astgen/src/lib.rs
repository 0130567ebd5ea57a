use proc_macro::TokenStream;
use heck::SnakeCase;
use quote::{format_ident, quote};
use syn::{
    braced, bracketed,
    parse::{ParseStream, Parser},
    punctuated::Punctuated,
    Field, Ident, Token,
};

struct NodeDef {
    name: Ident,
    fields: Vec<Field>,
}

fn parse_node(input: ParseStream) -> syn::Result<NodeDef> {
    let name = input.parse()?;
    input.parse::<Token![=>]>()?;
    let body;
    braced!(body in input);
    let fields = Punctuated::<Field, Token![,]>::parse_terminated_with(&body, Field::parse_named)?;
    Ok(NodeDef { name, fields: fields.into_iter().collect() })
}

fn parse_tree(input: ParseStream) -> syn::Result<(Ident, Vec<NodeDef>)> {
    let name = input.parse()?;
    input.parse::<Token![,]>()?;
    let body;
    bracketed!(body in input);
    let nodes = Punctuated::<NodeDef, Token![;]>::parse_terminated_with(&body, parse_node)?;
    Ok((name, nodes.into_iter().collect()))
}

/// Declares a syntax tree type:
///
/// ```text
/// generate_ast!(Expr, [
///     Literal => { value: Value };
///     Unary => { operator: Token, operand: Box<Expr> };
/// ]);
/// ```
///
/// expands to `enum Expr { Literal(Literal), Unary(Unary) }`, a struct per
/// node with crate-visible fields (field attributes such as doc comments are
/// carried over), and constructors `Expr::new_literal(value)` and
/// `Expr::new_unary(operator, operand)` taking fields in declaration order.
/// Everything derives `Clone`, `Debug` and `PartialEq`.
#[proc_macro]
pub fn generate_ast(input: TokenStream) -> TokenStream {
    let (tree, nodes) = match parse_tree.parse(input) {
        Ok(parsed) => parsed,
        Err(e) => return e.to_compile_error().into(),
    };

    let variants: Vec<_> = nodes.iter().map(|n| &n.name).collect();

    let structs = nodes.iter().map(|n| {
        let node = &n.name;
        let fields = n.fields.iter().map(|f| {
            let (attrs, ident, ty) = (&f.attrs, &f.ident, &f.ty);
            quote! { #(#attrs)* pub(crate) #ident: #ty }
        });
        quote! {
            #[derive(Clone, Debug, PartialEq)]
            pub struct #node { #(#fields),* }
        }
    });

    let constructors = nodes.iter().map(|n| {
        let node = &n.name;
        let constructor = format_ident!("new_{}", node.to_string().to_snake_case());
        let params = n.fields.iter().map(|f| {
            let (ident, ty) = (&f.ident, &f.ty);
            quote! { #ident: #ty }
        });
        let args = n.fields.iter().map(|f| &f.ident);
        quote! {
            pub fn #constructor(#(#params),*) -> Self {
                #tree::#node(#node { #(#args),* })
            }
        }
    });

    (quote! {
        #[derive(Clone, Debug, PartialEq)]
        pub enum #tree {
            #(#variants(#variants)),*
        }

        #(#structs)*

        impl #tree {
            #(#constructors)*
        }
    }).into()
}
