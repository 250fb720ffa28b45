use proc_macro::TokenStream as TokenStream1;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{self, parse_macro_input};

/// This macro is added before a method of `Game` struct in the impl block.
/// Use this macro to first check if current game phase is exactly the phase in
/// the attribute.
///
/// For example, `#[allowed_phase(PlayerTurn)]` will make a method first check
/// if current game phase is `PlayerTurn`. If not, the method will return
/// `Error::WrongPhase` naming the method and the phase it requires.
///
/// The annotated method must return `crate::Result<_>`, and the struct must
/// keep its phase in a field called `phase` of type `GamePhase`.
#[proc_macro_attribute]
pub fn allowed_phase(attr: TokenStream1, item: TokenStream1) -> TokenStream1 {
    let phase = parse_macro_input!(attr as syn::Ident);
    let mut ast = parse_macro_input!(item as syn::ImplItemFn);

    let operation = ast.sig.ident.to_string();
    let phase_name = phase.to_string();
    let early_return: syn::Stmt = syn::parse_quote! {
        if self.phase != GamePhase::#phase {
            return Err(crate::Error::WrongPhase {
                operation: #operation,
                phase: #phase_name,
            });
        }
    };
    ast.block.stmts.insert(0, early_return);

    let expanded: TokenStream2 = quote! { #ast };
    expanded.into_token_stream().into()
}
