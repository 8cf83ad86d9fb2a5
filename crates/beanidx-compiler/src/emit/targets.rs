//! Per-target case emission, one function per routine.

use beanidx_bytecode::{Instruction, InvokeKind, ParamTypes};
use beanidx_core::{MethodSignature, TypeRef};

use crate::catalog::{DispatchTarget, InterceptedTarget};

use super::EmitError;
use super::writer::CaseWriter;

/// Case of the multi-value `dispatch` routine.
pub(super) fn dispatch_case(
    index: u32,
    target: &DispatchTarget,
    this_type: &str,
) -> Result<Vec<Instruction>, EmitError> {
    let mut w = CaseWriter::new(index);
    match target {
        DispatchTarget::Method(m) => {
            direct_invoke(&mut w, index, &m.declaring, &m.signature, m.interface)?;
        }
        DispatchTarget::InterceptedMethod(m) => {
            if m.this_type != this_type {
                return Err(EmitError::ForeignInterceptedTarget {
                    index,
                    expected: this_type.to_owned(),
                    found: m.this_type.clone(),
                });
            }
            intercepted_invoke(&mut w, index, m)?;
        }
        DispatchTarget::FieldGet(_) | DispatchTarget::FieldSet(_) => {
            unreachable!("field targets never support multi-value dispatch")
        }
    }
    w.finish()
}

/// Case of the single-value `dispatch_one` routine.
pub(super) fn dispatch_one_case(
    index: u32,
    target: &DispatchTarget,
) -> Result<Vec<Instruction>, EmitError> {
    let mut w = CaseWriter::new(index);
    match target {
        DispatchTarget::FieldGet(f) => {
            w.push(Instruction::LoadTarget);
            w.cast(&TypeRef::class(&f.owner));
            w.push(Instruction::GetField {
                owner: f.owner.clone(),
                name: f.name.clone(),
                ty: f.ty.clone(),
            });
            if let Some(prim) = f.ty.as_primitive() {
                w.push(Instruction::Box(prim));
            }
            w.push(Instruction::Return);
        }
        DispatchTarget::FieldSet(f) => {
            w.push(Instruction::LoadTarget);
            w.cast(&TypeRef::class(&f.owner));
            w.push(Instruction::LoadArg);
            w.cast(&f.ty);
            w.push(Instruction::PutField {
                owner: f.owner.clone(),
                name: f.name.clone(),
                ty: f.ty.clone(),
            });
            w.push(Instruction::PushNull);
            w.push(Instruction::Return);
        }
        DispatchTarget::Method(m) => {
            let sig = &m.signature;
            if sig.arity() > 1 {
                return Err(EmitError::OneDispatchArity {
                    index,
                    method: format!("{}.{}", m.declaring, sig.name),
                    arity: sig.arity(),
                });
            }
            w.push(Instruction::LoadTarget);
            w.cast(&TypeRef::class(&m.declaring));
            if let Some(param) = sig.params.first() {
                w.push(Instruction::LoadArg);
                w.cast(param);
            }
            w.push(invoke(&m.declaring, sig, m.interface));
            w.normalize_result(&sig.return_type);
            w.push(Instruction::Return);
        }
        DispatchTarget::InterceptedMethod(_) => {
            unreachable!("intercepted methods never support single-value dispatch")
        }
    }
    w.finish()
}

/// Case of the `target_method` locator: a lookup of the real method on its
/// declaring type, for plain and intercepted methods alike.
pub(super) fn locator_case(
    index: u32,
    target: &DispatchTarget,
) -> Result<Vec<Instruction>, EmitError> {
    let Some((declaring, sig, _)) = target.method_parts() else {
        unreachable!("locator cases are emitted for method targets only")
    };
    let mut w = CaseWriter::new(index);
    w.push(Instruction::ResolveMethod {
        owner: declaring.to_owned(),
        name: sig.name.clone(),
        params: ParamTypes::from_params(&sig.params),
    });
    w.finish()
}

fn invoke(owner: &str, method: &MethodSignature, interface: bool) -> Instruction {
    Instruction::Invoke {
        kind: if interface {
            InvokeKind::Interface
        } else {
            InvokeKind::Virtual
        },
        owner: owner.to_owned(),
        method: method.clone(),
    }
}

fn load_args(w: &mut CaseWriter, index: u32, params: &[TypeRef]) -> Result<(), EmitError> {
    for (i, param) in params.iter().enumerate() {
        let pos = u16::try_from(i).map_err(|_| EmitError::TooManyParameters {
            index,
            arity: params.len(),
        })?;
        w.push(Instruction::LoadArgAt(pos));
        w.cast(param);
    }
    Ok(())
}

fn direct_invoke(
    w: &mut CaseWriter,
    index: u32,
    declaring: &str,
    sig: &MethodSignature,
    interface: bool,
) -> Result<(), EmitError> {
    w.push(Instruction::LoadTarget);
    w.cast(&TypeRef::class(declaring));
    load_args(w, index, &sig.params)?;
    w.push(invoke(declaring, sig, interface));
    w.normalize_result(&sig.return_type);
    w.push(Instruction::Return);
    Ok(())
}

fn intercepted_invoke(
    w: &mut CaseWriter,
    index: u32,
    m: &InterceptedTarget,
) -> Result<(), EmitError> {
    let direct = w.new_label();
    let proxy = TypeRef::class(&m.proxy_type);

    w.push(Instruction::LoadInterceptable);
    w.if_false(direct);
    w.push(Instruction::LoadTarget);
    w.push(Instruction::InstanceOf(proxy.clone()));
    w.if_false(direct);

    w.push(Instruction::LoadTarget);
    w.cast(&proxy);
    load_args(w, index, &m.signature.params)?;
    // Bridges live on the generated proxy class, never on an interface.
    w.push(invoke(&m.proxy_type, &m.bridge_signature(), false));
    w.normalize_result(&m.signature.return_type);
    w.push(Instruction::Return);

    w.place(direct);
    direct_invoke(w, index, &m.declaring, &m.signature, m.interface)
}
