use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DataEnum, DeriveInput, Error, Fields,
    Generics, Ident, Lit, Meta, NestedMeta, Path, Result, Type,
};

/// Implements `ard_inspect::value::Inspect`.
///
/// Container attributes:
/// - `#[inspect(class)]`: the type has reference semantics.
/// - `#[inspect(properties = "path")]`: `fn(&Self) -> Vec<Member>`, appended after the fields.
/// - `#[inspect(object_name = "path")]`: `fn(&Self) -> Result<String, InspectError>`.
///
/// Field attributes:
/// - `#[inspect(skip)]`
/// - `#[inspect(rename = "name")]`
/// - `#[inspect(interface)]`: shown as an interface without reading the value.
/// - `#[inspect(opaque)]`: shown as an unknown type without reading the value.
#[proc_macro_derive(Inspect, attributes(inspect))]
pub fn inspect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    impl_inspect(&ast)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

#[derive(Default)]
struct ContainerAttributes {
    class: bool,
    properties: Option<Path>,
    object_name: Option<Path>,
}

#[derive(Default)]
struct FieldAttributes {
    skip: bool,
    rename: Option<String>,
    interface: bool,
    opaque: bool,
}

/// A field that will become a member.
struct MemberField<'a> {
    ty: &'a Type,
    attrs: FieldAttributes,
}

fn impl_inspect(ast: &DeriveInput) -> Result<TokenStream2> {
    let attrs = container_attributes(&ast.attrs)?;
    match &ast.data {
        Data::Struct(data) => impl_struct(ast, &attrs, &data.fields),
        Data::Enum(data) if is_fieldless(data) => impl_fieldless_enum(ast, data),
        Data::Enum(data) => impl_data_enum(ast, &attrs, data),
        Data::Union(_) => Err(Error::new_spanned(
            &ast.ident,
            "`Inspect` cannot be derived for unions",
        )),
    }
}

fn impl_struct(
    ast: &DeriveInput,
    attrs: &ContainerAttributes,
    fields: &Fields,
) -> Result<TokenStream2> {
    let name = &ast.ident;
    let members = member_fields(fields)?;
    let generics = with_bounds(&ast.generics, &members);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let pushes = fields
        .iter()
        .enumerate()
        .zip(field_attributes_of(fields)?)
        .filter(|(_, attrs)| !attrs.skip)
        .map(|((i, field), attrs)| {
            let access = match &field.ident {
                Some(ident) => quote!(&self.#ident),
                None => {
                    let index = syn::Index::from(i);
                    quote!(&self.#index)
                }
            };
            let label = label_of(field.ident.as_ref(), i, &attrs);
            member_expr(&label, &field.ty, &attrs, access)
        });

    let flags = container_flags(attrs);
    let properties = properties_expr(attrs);
    let object_name = object_name_fn(attrs, None);

    Ok(quote! {
        impl #impl_generics ::ard_inspect::value::Inspect for #name #ty_generics #where_clause {
            #[inline]
            fn descriptor(&self) -> ::ard_inspect::descriptor::TypeDescriptor {
                ::ard_inspect::descriptor::TypeDescriptor::of::<Self>(#flags)
            }

            #object_name

            fn members(
                &self,
            ) -> ::std::result::Result<
                ::std::vec::Vec<::ard_inspect::value::Member>,
                ::ard_inspect::error::InspectError,
            > {
                #[allow(unused_mut)]
                let mut members = ::std::vec::Vec::new();
                #(members.push(#pushes);)*
                #properties
                ::std::result::Result::Ok(members)
            }
        }
    })
}

fn impl_fieldless_enum(ast: &DeriveInput, data: &DataEnum) -> Result<TokenStream2> {
    if !ast.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &ast.generics,
            "`Inspect` cannot be derived for generic fieldless enums",
        ));
    }

    let name = &ast.ident;
    let variants: Vec<&Ident> = data.variants.iter().map(|v| &v.ident).collect();
    let names: Vec<String> = variants.iter().map(|v| v.to_string()).collect();

    Ok(quote! {
        impl ::ard_inspect::value::Inspect for #name {
            fn descriptor(&self) -> ::ard_inspect::descriptor::TypeDescriptor {
                const CONSTANTS: &[::ard_inspect::descriptor::EnumConstant] = &[
                    #(::ard_inspect::descriptor::EnumConstant {
                        name: #names,
                        value: #name::#variants as i64,
                    },)*
                ];
                ::ard_inspect::descriptor::TypeDescriptor::of::<Self>(
                    ::ard_inspect::descriptor::TypeFlags::VALUE_TYPE,
                )
                .with_constants(CONSTANTS)
            }

            fn display(
                &self,
            ) -> ::std::result::Result<::std::string::String, ::ard_inspect::error::InspectError>
            {
                let constant = match self {
                    #(#name::#variants => #names,)*
                };
                ::std::result::Result::Ok(::std::string::String::from(constant))
            }
        }
    })
}

/// Data carrying enums are shown as a struct holding the active variant's fields, named after
/// the variant.
fn impl_data_enum(
    ast: &DeriveInput,
    attrs: &ContainerAttributes,
    data: &DataEnum,
) -> Result<TokenStream2> {
    let name = &ast.ident;

    let mut all_members = Vec::new();
    let mut arms = Vec::new();
    let mut name_arms = Vec::new();

    for variant in &data.variants {
        let ident = &variant.ident;
        let variant_name = ident.to_string();
        let field_attrs = field_attributes_of(&variant.fields)?;
        all_members.extend(member_fields(&variant.fields)?);

        let bindings: Vec<Ident> = (0..variant.fields.len())
            .map(|i| format_ident!("__field{}", i))
            .collect();

        let pattern = match &variant.fields {
            Fields::Named(fields) => {
                let idents = fields.named.iter().map(|f| &f.ident);
                quote!(#name::#ident { #(#idents: #bindings,)* })
            }
            Fields::Unnamed(_) => quote!(#name::#ident(#(#bindings,)*)),
            Fields::Unit => quote!(#name::#ident),
        };

        let pushes = variant
            .fields
            .iter()
            .enumerate()
            .zip(field_attrs)
            .filter(|(_, attrs)| !attrs.skip)
            .map(|((i, field), attrs)| {
                let binding = &bindings[i];
                let label = label_of(field.ident.as_ref(), i, &attrs);
                member_expr(&label, &field.ty, &attrs, quote!(#binding))
            });

        arms.push(quote! {
            #[allow(unused_variables)]
            #pattern => {
                #(members.push(#pushes);)*
            }
        });
        name_arms.push(quote!(#name::#ident { .. } => #variant_name,));
    }

    let generics = with_bounds(&ast.generics, &all_members);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let flags = container_flags(attrs);
    let properties = properties_expr(attrs);
    let object_name = object_name_fn(
        attrs,
        Some(quote! {
            ::std::option::Option::Some(::std::result::Result::Ok(
                ::std::string::String::from(match self {
                    #(#name_arms)*
                }),
            ))
        }),
    );

    Ok(quote! {
        impl #impl_generics ::ard_inspect::value::Inspect for #name #ty_generics #where_clause {
            #[inline]
            fn descriptor(&self) -> ::ard_inspect::descriptor::TypeDescriptor {
                ::ard_inspect::descriptor::TypeDescriptor::of::<Self>(#flags)
            }

            #object_name

            fn members(
                &self,
            ) -> ::std::result::Result<
                ::std::vec::Vec<::ard_inspect::value::Member>,
                ::ard_inspect::error::InspectError,
            > {
                #[allow(unused_mut)]
                let mut members = ::std::vec::Vec::new();
                match self {
                    #(#arms)*
                }
                #properties
                ::std::result::Result::Ok(members)
            }
        }
    })
}

///////////////
// Utilities //
///////////////

fn is_fieldless(data: &DataEnum) -> bool {
    !data.variants.is_empty()
        && data
            .variants
            .iter()
            .all(|variant| matches!(variant.fields, Fields::Unit))
}

fn container_flags(attrs: &ContainerAttributes) -> TokenStream2 {
    if attrs.class {
        quote!(::ard_inspect::descriptor::TypeFlags::CLASS)
    } else {
        quote!(::ard_inspect::descriptor::TypeFlags::VALUE_TYPE)
    }
}

fn properties_expr(attrs: &ContainerAttributes) -> TokenStream2 {
    match &attrs.properties {
        Some(path) => quote!(members.extend(#path(self));),
        None => TokenStream2::new(),
    }
}

fn object_name_fn(attrs: &ContainerAttributes, fallback: Option<TokenStream2>) -> TokenStream2 {
    let body = match (&attrs.object_name, fallback) {
        (Some(path), _) => quote!(::std::option::Option::Some(#path(self))),
        (None, Some(fallback)) => fallback,
        (None, None) => return TokenStream2::new(),
    };

    quote! {
        fn object_name(
            &self,
        ) -> ::std::option::Option<
            ::std::result::Result<::std::string::String, ::ard_inspect::error::InspectError>,
        > {
            #body
        }
    }
}

fn member_expr(
    label: &str,
    ty: &Type,
    attrs: &FieldAttributes,
    access: TokenStream2,
) -> TokenStream2 {
    if attrs.interface {
        quote!(::ard_inspect::value::Member::field(
            #label,
            &::ard_inspect::impls::InterfaceRef::of::<#ty>(),
        ))
    } else if attrs.opaque {
        quote!(::ard_inspect::value::Member::field(
            #label,
            &::ard_inspect::impls::Opaque::of::<#ty>(),
        ))
    } else {
        quote!(::ard_inspect::value::Member::field(#label, #access))
    }
}

fn label_of(ident: Option<&Ident>, index: usize, attrs: &FieldAttributes) -> String {
    match (&attrs.rename, ident) {
        (Some(rename), _) => rename.clone(),
        (None, Some(ident)) => ident.to_string().trim_start_matches("r#").to_owned(),
        (None, None) => index.to_string(),
    }
}

/// Fields whose values are read through `Reflect`.
fn member_fields(fields: &Fields) -> Result<Vec<MemberField<'_>>> {
    let mut out = Vec::new();
    for field in fields {
        let attrs = field_attributes(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        out.push(MemberField {
            ty: &field.ty,
            attrs,
        });
    }
    Ok(out)
}

fn field_attributes_of(fields: &Fields) -> Result<Vec<FieldAttributes>> {
    fields
        .iter()
        .map(|field| field_attributes(&field.attrs))
        .collect()
}

/// Every type parameter must be `'static`, and every read field must implement `Reflect`.
fn with_bounds(generics: &Generics, members: &[MemberField]) -> Generics {
    let mut generics = generics.clone();
    let params: Vec<Ident> = generics.type_params().map(|p| p.ident.clone()).collect();
    if params.is_empty() {
        return generics;
    }

    let where_clause = generics.make_where_clause();
    for param in params {
        where_clause.predicates.push(parse_quote!(#param: 'static));
    }
    for member in members {
        let ty = member.ty;
        if member.attrs.interface || member.attrs.opaque {
            where_clause.predicates.push(parse_quote!(#ty: 'static));
        } else {
            where_clause
                .predicates
                .push(parse_quote!(#ty: ::ard_inspect::value::Reflect));
        }
    }
    generics
}

fn inspect_meta(attrs: &[Attribute]) -> Result<Vec<NestedMeta>> {
    let mut nested = Vec::new();
    for attr in attrs.iter().filter(|attr| attr.path.is_ident("inspect")) {
        match attr.parse_meta()? {
            Meta::List(list) => nested.extend(list.nested),
            other => {
                return Err(Error::new_spanned(other, "expected `#[inspect(...)]`"));
            }
        }
    }
    Ok(nested)
}

fn container_attributes(attrs: &[Attribute]) -> Result<ContainerAttributes> {
    let mut out = ContainerAttributes::default();
    for meta in inspect_meta(attrs)? {
        match &meta {
            NestedMeta::Meta(Meta::Path(path)) if path.is_ident("class") => out.class = true,
            NestedMeta::Meta(Meta::NameValue(nv)) if nv.path.is_ident("properties") => {
                out.properties = Some(lit_path(&nv.lit)?);
            }
            NestedMeta::Meta(Meta::NameValue(nv)) if nv.path.is_ident("object_name") => {
                out.object_name = Some(lit_path(&nv.lit)?);
            }
            _ => return Err(Error::new_spanned(meta, "unknown `inspect` attribute")),
        }
    }
    Ok(out)
}

fn field_attributes(attrs: &[Attribute]) -> Result<FieldAttributes> {
    let mut out = FieldAttributes::default();
    for meta in inspect_meta(attrs)? {
        match &meta {
            NestedMeta::Meta(Meta::Path(path)) if path.is_ident("skip") => out.skip = true,
            NestedMeta::Meta(Meta::Path(path)) if path.is_ident("interface") => {
                out.interface = true
            }
            NestedMeta::Meta(Meta::Path(path)) if path.is_ident("opaque") => out.opaque = true,
            NestedMeta::Meta(Meta::NameValue(nv)) if nv.path.is_ident("rename") => {
                out.rename = Some(lit_str(&nv.lit)?);
            }
            _ => return Err(Error::new_spanned(meta, "unknown `inspect` attribute")),
        }
    }
    Ok(out)
}

fn lit_str(lit: &Lit) -> Result<String> {
    match lit {
        Lit::Str(s) => Ok(s.value()),
        _ => Err(Error::new_spanned(lit, "expected a string literal")),
    }
}

fn lit_path(lit: &Lit) -> Result<Path> {
    match lit {
        Lit::Str(s) => s.parse(),
        _ => Err(Error::new_spanned(lit, "expected a path in a string literal")),
    }
}
