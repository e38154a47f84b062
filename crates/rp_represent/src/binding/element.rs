use alloc::string::String;
use alloc::sync::Arc;

use rp_document::Value;

use crate::format::Format;
use crate::{Context, Definition, Model, RepresentError, Representer, Slot};

// -----------------------------------------------------------------------------
// Binding

/// Converts a single value of a property.
///
/// Untyped properties pass values through unchanged. Typed ones render a
/// model with its representer, and on apply construct a fresh instance of
/// the declared type and let the representer populate it.
#[derive(Clone, Copy, Debug)]
pub struct Binding<'d> {
    def: &'d Definition,
}

impl<'d> Binding<'d> {
    #[inline]
    pub const fn new(def: &'d Definition) -> Self {
        Self { def }
    }

    #[inline]
    pub const fn definition(&self) -> &'d Definition {
        self.def
    }

    /// The representer a nested model renders with.
    ///
    /// Without a declared one, the model's own type name is looked up.
    fn representer_for(
        &self,
        model: &dyn Model,
        ctx: &Context<'_>,
    ) -> Result<Arc<Representer>, RepresentError> {
        match &self.def.resolve(ctx.registry)?.representer {
            Some(representer) => Ok(representer.clone()),
            None => ctx.registry.resolve_representer(model.type_name()),
        }
    }

    pub fn serialize<F: Format>(&self, value: Slot, ctx: &Context<'_>) -> Result<Value, RepresentError> {
        if !self.def.is_typed() {
            return value.into_value();
        }
        if value.is_nil() {
            return Ok(Value::Nil);
        }
        let model = match value {
            Slot::Model(model) => model,
            other => return Err(RepresentError::mismatch("model", other.kind_name())),
        };

        let representer = self.representer_for(&*model, ctx)?;
        let doc = representer.render_with::<F>(&*model, &Context::new(ctx.registry, &ctx.options.nested()))?;
        Ok(F::into_fragment(doc))
    }

    pub fn deserialize<F: Format>(&self, fragment: Value, ctx: &Context<'_>) -> Result<Slot, RepresentError> {
        if !self.def.is_typed() {
            return Ok(Slot::from(fragment));
        }
        if fragment.is_nil() {
            return Ok(Slot::Nil);
        }

        let target = self.def.resolve(ctx.registry)?;
        let Some(entry) = &target.entry else {
            return Err(RepresentError::NotInstantiable {
                property: String::from(self.def.name()),
            });
        };
        let representer = target.representer.as_ref().unwrap_or(entry.representer());

        let doc = F::from_fragment(fragment)?;
        let mut model = entry.instantiate();
        representer.apply_with::<F>(&doc, &mut *model, &Context::new(ctx.registry, &ctx.options.nested()))?;
        Ok(Slot::Model(model))
    }
}
