//! JNI entry points for the `dev.cputier.CpuFeatures` host class.
//!
//! ```java
//! package dev.cputier;
//!
//! public final class CpuFeatures {
//!     static { System.loadLibrary("cputier"); }
//!     public static native boolean hasDotProd();
//!     public static native boolean hasArmV9();
//!     public static native boolean hasI8mm();
//!     public static native String getBestTier();
//! }
//! ```

use ct_core::CpuFeatures;
use jni::objects::JClass;
use jni::sys::{jboolean, jstring, JNI_FALSE, JNI_TRUE};
use jni::JNIEnv;
use tracing::error;

fn to_jboolean(b: bool) -> jboolean {
    if b {
        JNI_TRUE
    } else {
        JNI_FALSE
    }
}

#[no_mangle]
pub extern "system" fn Java_dev_cputier_CpuFeatures_hasDotProd<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jboolean {
    to_jboolean(CpuFeatures::new().has_dot_prod())
}

#[no_mangle]
pub extern "system" fn Java_dev_cputier_CpuFeatures_hasArmV9<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jboolean {
    to_jboolean(CpuFeatures::new().has_armv9())
}

#[no_mangle]
pub extern "system" fn Java_dev_cputier_CpuFeatures_hasI8mm<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jboolean {
    to_jboolean(CpuFeatures::new().has_i8mm())
}

/// Returns null only if the JVM cannot allocate the string, in which case a
/// Java exception is already pending.
#[no_mangle]
pub extern "system" fn Java_dev_cputier_CpuFeatures_getBestTier<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jstring {
    let tier = CpuFeatures::new().best_tier();
    match env.new_string(tier.as_str()) {
        Ok(name) => name.into_raw(),
        Err(e) => {
            error!(target: "cputier::jni", tier = %tier, error = %e, "NewStringUTF failed");
            std::ptr::null_mut()
        }
    }
}
