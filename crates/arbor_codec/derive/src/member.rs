use arbor_macro_utils::Manifest;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, FnArg, Ident, ImplItem, ImplItemFn, ItemImpl, Path, ReturnType, Type, TypePath};

// -----------------------------------------------------------------------------
// Markers

#[derive(Clone, Copy, PartialEq, Eq)]
enum Marker {
    Serializer,
    Deserializer,
    Constructor,
}

impl Marker {
    fn name(self) -> &'static str {
        match self {
            Self::Serializer => "serializer",
            Self::Deserializer => "deserializer",
            Self::Constructor => "constructor",
        }
    }

    fn of(attr: &Attribute) -> Option<Self> {
        let path = attr.path();
        if path.is_ident("serializer") {
            Some(Self::Serializer)
        } else if path.is_ident("deserializer") {
            Some(Self::Deserializer)
        } else if path.is_ident("constructor") {
            Some(Self::Constructor)
        } else {
            None
        }
    }

    /// Removes the markers from `attrs` and returns the one found.
    fn take(attrs: &mut Vec<Attribute>) -> syn::Result<Option<Self>> {
        let mut found = None;
        let mut res = Ok(());
        attrs.retain(|attr| {
            let Some(marker) = Self::of(attr) else {
                return true;
            };
            if found.is_some() {
                res = Err(syn::Error::new_spanned(attr, "a method takes one codec marker"));
            }
            found = Some(marker);
            false
        });
        res.map(|()| found)
    }
}

// -----------------------------------------------------------------------------
// Parameters

/// A parameter the generated thunk can supply.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Param {
    Node,
    NodeMut,
    Encoder,
    Working,
    Decoder,
}

impl Param {
    /// Classifies by the referenced type's last path segment.
    fn classify(arg: &FnArg) -> Option<Self> {
        let FnArg::Typed(arg) = arg else {
            return None;
        };
        let Type::Reference(reference) = &*arg.ty else {
            return None;
        };
        let Type::Path(TypePath { path, qself: None }) = &*reference.elem else {
            return None;
        };
        let ident = &path.segments.last()?.ident;
        let mutable = reference.mutability.is_some();

        if ident == "TreeNode" {
            Some(if mutable { Self::NodeMut } else { Self::Node })
        } else if ident == "Encoder" && mutable {
            Some(Self::Encoder)
        } else if ident == "WorkingObject" && mutable {
            Some(Self::Working)
        } else if ident == "Decoder" && mutable {
            Some(Self::Decoder)
        } else {
            None
        }
    }

    fn ident(self) -> Ident {
        match self {
            Self::Node | Self::NodeMut => format_ident!("node"),
            Self::Encoder => format_ident!("encoder"),
            Self::Working => format_ident!("working"),
            Self::Decoder => format_ident!("decoder"),
        }
    }
}

type Reason = &'static str;

/// The non-receiver parameters, checked against the required and optional
/// sets.
fn params(method: &ImplItemFn, required: &[Param], optional: &[Param]) -> Result<Vec<Param>, Reason> {
    let mut found = Vec::new();
    for arg in &method.sig.inputs {
        if let FnArg::Receiver(_) = arg {
            continue;
        }
        let param = Param::classify(arg)
            .filter(|param| required.contains(param) || optional.contains(param))
            .ok_or("has a parameter the codec can not supply")?;
        if found.contains(&param) {
            return Err("takes the same parameter twice");
        }
        found.push(param);
    }
    if required.iter().any(|param| !found.contains(param)) {
        return Err("is missing a required parameter");
    }
    Ok(found)
}

/// The thunk's name for `param`, or `_` when the method does not use it.
fn bind(params: &[Param], param: Param) -> TokenStream {
    if params.contains(&param) {
        let ident = param.ident();
        quote!(#ident)
    } else {
        quote!(_)
    }
}

fn returns_outcome(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return true;
    };
    match &**ty {
        Type::Tuple(tuple) => tuple.elems.is_empty(),
        Type::Path(TypePath { path, qself: None }) => path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "bool" || segment.ident == "Result"),
        _ => false,
    }
}

fn returns_self(output: &ReturnType, self_ident: Option<&Ident>) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(TypePath { path, qself: None }) = &**ty else {
        return false;
    };
    path.is_ident("Self") || path.segments.last().map(|s| &s.ident) == self_ident
}

// -----------------------------------------------------------------------------
// Thunks

struct Target<'a> {
    self_ty: &'a Type,
    self_ident: Option<&'a Ident>,
    exports: &'a TokenStream,
}

/// A generated adapter function and the `MemberKind` naming it.
struct Thunk {
    item: TokenStream,
    kind: TokenStream,
}

fn serializer(method: &ImplItemFn, target: &Target<'_>) -> Result<Thunk, Reason> {
    match method.sig.receiver() {
        Some(receiver) if receiver.reference.is_some() && receiver.mutability.is_none() => {}
        _ => return Err("must take `&self`"),
    }
    let params = params(method, &[Param::NodeMut], &[Param::Encoder])?;
    if !returns_outcome(&method.sig.output) {
        return Err("must return `()`, `bool` or a `Result` of either");
    }

    let Target { self_ty, exports, .. } = target;
    let ident = &method.sig.ident;
    let thunk = format_ident!("__serialize_{}", ident);
    let encoder = bind(&params, Param::Encoder);
    let args = params.iter().map(|param| param.ident());

    Ok(Thunk {
        item: quote! {
            fn #thunk(
                value: &dyn #exports::Reflect,
                node: &mut #exports::TreeNode,
                #encoder: &mut #exports::Encoder,
            ) -> ::core::result::Result<bool, #exports::EncodeError> {
                let ::core::option::Option::Some(this) = value.downcast_ref::<#self_ty>() else {
                    return ::core::result::Result::Ok(false);
                };
                #exports::SurrogateOutcome::<#exports::EncodeError>::into_outcome(
                    <#self_ty>::#ident(this, #(#args),*)
                )
            }
        },
        kind: quote!(#exports::MemberKind::Serializer(#thunk)),
    })
}

fn deserializer(method: &ImplItemFn, target: &Target<'_>) -> Result<Thunk, Reason> {
    if method.sig.receiver().is_some() {
        return Err("must not take `self`");
    }
    let params = params(method, &[Param::Working, Param::Node], &[Param::Decoder])?;
    if !returns_outcome(&method.sig.output) {
        return Err("must return `()`, `bool` or a `Result` of either");
    }

    let Target { self_ty, exports, .. } = target;
    let ident = &method.sig.ident;
    let thunk = format_ident!("__deserialize_{}", ident);
    let decoder = bind(&params, Param::Decoder);
    let args = params.iter().map(|param| param.ident());

    Ok(Thunk {
        item: quote! {
            fn #thunk(
                working: &mut #exports::WorkingObject<'_>,
                node: &#exports::TreeNode,
                #decoder: &mut #exports::Decoder<'_>,
            ) -> ::core::result::Result<bool, #exports::DecodeError> {
                #exports::SurrogateOutcome::<#exports::DecodeError>::into_outcome(
                    <#self_ty>::#ident(#(#args),*)
                )
            }
        },
        kind: quote!(#exports::MemberKind::Deserializer(#thunk)),
    })
}

fn constructor(method: &ImplItemFn, target: &Target<'_>) -> Result<Thunk, Reason> {
    if !method.sig.inputs.is_empty() {
        return Err("must take no parameters");
    }
    if !returns_self(&method.sig.output, target.self_ident) {
        return Err("must return `Self`");
    }

    let Target { self_ty, exports, .. } = target;
    let ident = &method.sig.ident;
    let thunk = format_ident!("__construct_{}", ident);

    Ok(Thunk {
        item: quote! {
            fn #thunk() -> #exports::Box<dyn #exports::Reflect> {
                #exports::Box::new(<#self_ty>::#ident())
            }
        },
        kind: quote!(#exports::MemberKind::Constructor(#thunk)),
    })
}

// -----------------------------------------------------------------------------
// Expansion

struct Member {
    name: String,
    marker: Marker,
    thunk: Result<Thunk, Reason>,
}

impl Member {
    fn submit(&self, target: &Target<'_>) -> TokenStream {
        let Target { self_ty, exports, .. } = target;
        let name = &self.name;
        let (item, kind) = match &self.thunk {
            Ok(Thunk { item, kind }) => (item.clone(), kind.clone()),
            Err(reason) => {
                let marker = self.marker.name();
                (
                    TokenStream::new(),
                    quote!(#exports::MemberKind::Invalid { marker: #marker, reason: #reason }),
                )
            }
        };

        quote! {
            const _: () = {
                #item

                #exports::inventory::submit! {
                    #exports::ImplicitMember {
                        type_id: #exports::TypeId::of::<#self_ty>,
                        name: #name,
                        kind: #kind,
                    }
                }
            };
        }
    }
}

pub(crate) fn expand(item: &mut ItemImpl) -> syn::Result<TokenStream> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "`codec_methods` applies to inherent impl blocks",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "`codec_methods` does not support generic impl blocks",
        ));
    }

    let codec: Path = Manifest::shared(|m| m.get_crate_path("arbor_codec"));
    let exports = quote!(#codec::__macro_exports);
    let self_ty = (*item.self_ty).clone();
    let self_ident = match &self_ty {
        Type::Path(TypePath { path, qself: None }) => path.segments.last().map(|s| s.ident.clone()),
        _ => None,
    };
    let target = Target {
        self_ty: &self_ty,
        self_ident: self_ident.as_ref(),
        exports: &exports,
    };

    let mut members = Vec::new();
    for impl_item in &mut item.items {
        let (attrs, ident) = match impl_item {
            ImplItem::Fn(method) => {
                if let Some(marker) = Marker::take(&mut method.attrs)? {
                    let thunk = match marker {
                        Marker::Serializer => serializer(method, &target),
                        Marker::Deserializer => deserializer(method, &target),
                        Marker::Constructor => constructor(method, &target),
                    };
                    members.push(Member {
                        name: method.sig.ident.to_string(),
                        marker,
                        thunk,
                    });
                }
                continue;
            }
            ImplItem::Const(item) => (&mut item.attrs, &item.ident),
            ImplItem::Type(item) => (&mut item.attrs, &item.ident),
            _ => continue,
        };
        if let Some(marker) = Marker::take(attrs)? {
            members.push(Member {
                name: ident.to_string(),
                marker,
                thunk: Err("is not a method"),
            });
        }
    }

    let submits = members.iter().map(|member| member.submit(&target));
    Ok(quote! {
        #item
        #(#submits)*
    })
}
