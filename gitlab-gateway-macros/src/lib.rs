//! Procedural macros for gitlab-gateway
//!
//! Provides the `#[gitlab_tool]` attribute that turns an argument struct into a
//! registered MCP tool.

use darling::{FromMeta, ast::NestedMeta};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{DeriveInput, parse_macro_input};

/// Arguments for the `#[gitlab_tool]` attribute
#[derive(Debug, FromMeta)]
struct GitLabToolArgs {
    /// Tool name as exposed over MCP (e.g., "create_issue")
    name: String,
    /// Tool description shown to MCP clients
    description: String,
    /// Tool category used for grouping in listings
    category: String,
    /// Operation type: "read" or "write"
    operation: String,
}

/// Attribute macro for GitLab gateway tools.
///
/// Generates:
/// - `#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]` on the struct
/// - a `ToolInfo` implementation (name, description, category, operation type)
/// - an `inventory` submission so `ToolRegistry::with_all_tools` picks the tool up
///
/// # Example
///
/// ```ignore
/// #[gitlab_tool(
///     name = "create_issue",
///     description = "Create a new issue in a GitLab project",
///     category = "issues",
///     operation = "write"
/// )]
/// pub struct CreateIssue {
///     /// Project ID or URL-encoded path
///     pub project_id: String,
///     /// Issue title
///     pub title: String,
/// }
///
/// #[async_trait]
/// impl ToolExecutor for CreateIssue {
///     async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
///         // ...
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn gitlab_tool(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr_args = match NestedMeta::parse_meta_list(attr.into()) {
        Ok(v) => v,
        Err(e) => return TokenStream::from(e.to_compile_error()),
    };

    let args = match GitLabToolArgs::from_list(&attr_args) {
        Ok(v) => v,
        Err(e) => return TokenStream::from(e.write_errors()),
    };

    let input = parse_macro_input!(item as DeriveInput);
    let expanded = impl_gitlab_tool(&args, &input);

    TokenStream::from(expanded)
}

fn impl_gitlab_tool(args: &GitLabToolArgs, input: &DeriveInput) -> TokenStream2 {
    let struct_name = &input.ident;
    let tool_name = &args.name;
    let description = &args.description;

    let category_variant = match args.category.as_str() {
        "projects" => quote! { crate::tools::ToolCategory::Projects },
        "repository" => quote! { crate::tools::ToolCategory::Repository },
        "merge_requests" => quote! { crate::tools::ToolCategory::MergeRequests },
        "mr_discussions" => quote! { crate::tools::ToolCategory::MrDiscussions },
        "issues" => quote! { crate::tools::ToolCategory::Issues },
        other => {
            return syn::Error::new_spanned(input, format!("Unknown category: {}", other))
                .to_compile_error();
        }
    };

    let operation_variant = match args.operation.as_str() {
        "read" => quote! { crate::tools::OperationType::Read },
        "write" => quote! { crate::tools::OperationType::Write },
        other => {
            return syn::Error::new_spanned(
                input,
                format!("Unknown operation: {}. Use: read or write", other),
            )
            .to_compile_error();
        }
    };

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(&input.generics, "gitlab_tool does not support generics")
            .to_compile_error();
    }

    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(
                    input,
                    "gitlab_tool only supports structs with named fields",
                )
                .to_compile_error();
            }
        },
        _ => {
            return syn::Error::new_spanned(input, "gitlab_tool only supports structs")
                .to_compile_error();
        }
    };

    let vis = &input.vis;
    let attrs = &input.attrs;
    let register_fn = format_ident!("__register_gitlab_tool_{}", struct_name);

    quote! {
        #(#attrs)*
        #[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
        #vis struct #struct_name {
            #fields
        }

        impl crate::tools::ToolInfo for #struct_name {
            fn name() -> &'static str {
                #tool_name
            }

            fn description() -> &'static str {
                #description
            }

            fn category() -> crate::tools::ToolCategory {
                #category_variant
            }

            fn operation_type() -> crate::tools::OperationType {
                #operation_variant
            }
        }

        #[allow(non_snake_case)]
        fn #register_fn(registry: &mut crate::tools::ToolRegistry) {
            registry.register::<#struct_name>();
        }

        ::inventory::submit! {
            crate::tools::ToolRegistration {
                register_fn: #register_fn,
            }
        }
    }
}
